use proptest::prelude::*;
use resxgen::parameters::{ParameterStyle, classify, positional_index};

fn named_token_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][A-Za-z0-9_]{0,10}").expect("valid token regex")
}

fn filler_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ,.!?]{0,8}").expect("valid filler regex")
}

fn join(tokens: &[String], fillers: &[String]) -> String {
    let mut value = String::new();
    for (i, token) in tokens.iter().enumerate() {
        value.push_str(fillers.get(i).map(String::as_str).unwrap_or(" "));
        value.push('{');
        value.push_str(token);
        value.push('}');
    }
    value
}

fn first_occurrences(tokens: &[String]) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for token in tokens {
        if !distinct.contains(token) {
            distinct.push(token.clone());
        }
    }
    distinct
}

proptest! {
    #[test]
    fn prop_named_tokens_keep_first_occurrence_order(
        tokens in prop::collection::vec(named_token_strategy(), 1..8),
        fillers in prop::collection::vec(filler_strategy(), 0..8),
    ) {
        let params = classify(&join(&tokens, &fillers));
        prop_assert_eq!(params.style, ParameterStyle::Named);
        prop_assert_eq!(params.tokens, first_occurrences(&tokens));
    }

    #[test]
    fn prop_positional_tokens_are_sorted_and_distinct(
        indices in prop::collection::vec(0u32..40, 1..10),
        fillers in prop::collection::vec(filler_strategy(), 0..10),
    ) {
        let tokens: Vec<String> = indices.iter().map(u32::to_string).collect();
        let params = classify(&join(&tokens, &fillers));
        prop_assert_eq!(params.style, ParameterStyle::Positional);

        let mut expected: Vec<u32> = indices.clone();
        expected.sort_unstable();
        expected.dedup();
        let actual: Vec<u64> = params.tokens.iter().map(|t| positional_index(t)).collect();
        prop_assert_eq!(actual, expected.into_iter().map(u64::from).collect::<Vec<_>>());
    }

    #[test]
    fn prop_named_wins_when_mixed(
        named in named_token_strategy(),
        index in 0u32..10,
    ) {
        let params = classify(&format!("{{{index}}} {{{named}}}"));
        prop_assert!(params.uses_named_parameters());
        prop_assert_eq!(params.tokens, vec![named]);
    }

    #[test]
    fn prop_values_without_braces_have_no_parameters(value in filler_strategy()) {
        let params = classify(&value);
        prop_assert!(params.is_empty());
    }
}
