//! Property-based tests for the tokenizer and the word extractor.
//!
//! Inputs are drawn from a small HTML-ish alphabet so that tags, comments,
//! references and raw-text regions show up often.

use html_wordlist::tokenizer::HtmlTokenizer;
use html_wordlist::{extract_words, CancellationToken, Document, Options, WordExtractor};
use proptest::prelude::*;

fn html_fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("<p>".to_string()),
            Just("</p>".to_string()),
            Just("<style>".to_string()),
            Just("</style>".to_string()),
            Just("<script>".to_string()),
            Just("</script>".to_string()),
            Just("<!--".to_string()),
            Just("-->".to_string()),
            Just("<br/>".to_string()),
            Just("&amp;".to_string()),
            Just("&#x41;".to_string()),
            Just("<".to_string()),
            Just(">".to_string()),
            Just("\"".to_string()),
            "[a-zA-Zé' _-]{0,8}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

fn any_options() -> impl Strategy<Value = Options> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(force_lowercase, ignore_script_tags, ignore_style_tags, ignore_comments)| Options {
            force_lowercase,
            ignore_script_tags,
            ignore_style_tags,
            ignore_comments,
            ..Options::default()
        },
    )
}

proptest! {
    #[test]
    fn tokenizer_never_panics(input in "\\PC{0,200}") {
        let _ = HtmlTokenizer::new(&input).count();
    }

    #[test]
    fn tokenizer_terminates_on_markup_soup(input in html_fragment()) {
        let count = HtmlTokenizer::new(&input).count();
        prop_assert!(count <= input.len());
    }

    #[test]
    fn words_are_non_empty_and_unique(input in html_fragment(), options in any_options()) {
        let words = extract_words(&input, &options).expect("valid options");
        let as_vec: Vec<&String> = words.iter().collect();

        prop_assert!(as_vec.iter().all(|w| !w.is_empty()));
        prop_assert!(as_vec.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn lowercase_words_have_no_uppercase(input in html_fragment()) {
        let options = Options { force_lowercase: true, ..Options::default() };
        let words = extract_words(&input, &options).expect("valid options");

        prop_assert!(words.iter().all(|w| w.to_lowercase() == *w));
    }

    #[test]
    fn extraction_is_idempotent(
        inputs in prop::collection::vec(html_fragment(), 0..5),
        options in any_options(),
    ) {
        let extractor = WordExtractor::new(options).expect("valid options");
        let documents: Vec<Document> = inputs.into_iter().map(Document::from_html).collect();

        let first = extractor.extract(&documents, &CancellationToken::new());
        let second = extractor.extract(&documents, &CancellationToken::new());

        prop_assert_eq!(first, second);
    }

    #[test]
    fn ignoring_comments_only_removes_words(input in html_fragment()) {
        let all = extract_words(&input, &Options::default()).expect("valid options");
        let options = Options { ignore_comments: true, ..Options::default() };
        let filtered = extract_words(&input, &options).expect("valid options");

        prop_assert!(filtered.is_subset(&all));
    }
}
