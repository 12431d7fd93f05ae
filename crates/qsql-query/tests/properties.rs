//! Properties of the compiled output over generated queries.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use proptest::prelude::*;
use qsql_query::{Compiler, Expr, Operator, QueryError, compile};

/// A bare word that is not a reserved keyword.
fn bare_word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_%]{0,7}".prop_filter("reserved keyword", |w| w != "and" && w != "or")
}

/// A word as typed in the query, paired with the parameter it must produce.
fn word() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        bare_word().prop_map(|w| (w.clone(), w)),
        "[a-z ]{0,8}".prop_map(|w| (format!("\"{w}\""), w)),
        "[a-z ]{0,8}".prop_map(|w| (format!("'{w}'"), w)),
    ]
}

/// Anything that may sit between two operands.
fn separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(" "), Just(" or "), Just(" and "), Just(" \t "), Just("\nor\n")]
}

/// A valid query and its words in the order they appear.
fn query() -> impl Strategy<Value = (String, Vec<String>)> {
    let leaf = word().prop_map(|(text, param)| (text, vec![param]));
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (
                prop::collection::vec((inner.clone(), separator()), 1..4),
                inner.clone()
            )
                .prop_map(|(pairs, (last_text, last_params))| {
                    let mut text = String::new();
                    let mut params = Vec::new();
                    for ((operand, operand_params), sep) in pairs {
                        text.push_str(&operand);
                        text.push_str(sep);
                        params.extend(operand_params);
                    }
                    text.push_str(&last_text);
                    params.extend(last_params);
                    (text, params)
                }),
            inner.prop_map(|(text, params)| (format!("({text})"), params)),
        ]
    })
}

proptest! {
    #[test]
    fn single_bare_word(w in bare_word()) {
        let out = compile(&w).unwrap();
        prop_assert_eq!(out.sql, "column_name LIKE ?");
        prop_assert_eq!(out.params, vec![w]);
    }

    #[test]
    fn params_follow_placeholders((text, words) in query()) {
        let out = compile(&text).unwrap();
        prop_assert_eq!(out.sql.matches('?').count(), out.params.len());
        prop_assert_eq!(out.params, words);
    }

    #[test]
    fn params_match_word_leaves((text, _) in query()) {
        let compiler = Compiler::default();
        let expr = compiler.expression(&text).unwrap();
        let out = compiler.compile(&text).unwrap();
        prop_assert_eq!(expr.words(), out.params.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn chains_nest_on_the_left(
        words in prop::collection::vec(bare_word(), 3..8),
        and in any::<bool>(),
    ) {
        let (op, sep) = if and { (Operator::And, " and ") } else { (Operator::Or, " or ") };
        let expr = Compiler::default().expression(&words.join(sep)).unwrap();
        let expected = words[1..]
            .iter()
            .fold(Expr::word(&words[0]), |acc, w| Expr::binary(op, acc, Expr::word(w)));
        prop_assert_eq!(expr, expected);
    }

    #[test]
    fn implicit_or_chains_nest_on_the_left(words in prop::collection::vec(bare_word(), 3..8)) {
        let expr = Compiler::default().expression(&words.join(" ")).unwrap();
        let expected = words[1..]
            .iter()
            .fold(Expr::word(&words[0]), |acc, w| Expr::or(acc, Expr::word(w)));
        prop_assert_eq!(expr, expected);
    }

    #[test]
    fn unterminated_quote_always_fails(prefix in bare_word(), body in "[a-z ]{0,8}") {
        for input in [format!("\"{body}"), format!("{prefix} '{body}")] {
            let result = compile(&input);
            prop_assert!(matches!(result, Err(QueryError::Syntax(_))), "{input:?} -> {result:?}");
        }
    }

    #[test]
    fn same_input_same_result((text, _) in query()) {
        prop_assert_eq!(compile(&text), compile(&text));
    }
}

#[test]
fn space_is_implicit_or() {
    let out = compile("aaa bbb").unwrap();
    assert_eq!(out.sql, "column_name LIKE ? or column_name LIKE ?");
    assert_eq!(out.params, vec!["aaa", "bbb"]);
}

#[test]
fn and_keyword() {
    let out = compile("aaa and bbb").unwrap();
    assert_eq!(out.sql, "column_name LIKE ? and column_name LIKE ?");
    assert_eq!(out.params, vec!["aaa", "bbb"]);
}

#[test]
fn and_binds_tighter_than_implicit_or() {
    let expr = Compiler::default().expression("aaa bbb and ccc").unwrap();
    assert_eq!(
        expr,
        Expr::or(
            Expr::word("aaa"),
            Expr::and(Expr::word("bbb"), Expr::word("ccc"))
        )
    );
}

#[test]
fn whitespace_after_group_separates() {
    let compiler = Compiler::default();
    let expr = compiler.expression("(aaa or bbb) and ccc").unwrap();
    assert_eq!(
        expr,
        Expr::and(
            Expr::group(Expr::or(Expr::word("aaa"), Expr::word("bbb"))),
            Expr::word("ccc")
        )
    );

    let out = compiler.compile("(aaa or bbb) and ccc").unwrap();
    assert_eq!(
        out.sql,
        "(column_name LIKE ? or column_name LIKE ?) and column_name LIKE ?"
    );
    assert_eq!(out.params, vec!["aaa", "bbb", "ccc"]);
}

#[test]
fn reserved_words() {
    assert!(compile("and").is_err());
    assert!(compile("or").is_err());

    let out = compile("\"and\"").unwrap();
    assert_eq!(out.sql, "column_name LIKE ?");
    assert_eq!(out.params, vec!["and"]);
}

#[test]
fn backslash_escapes_pass_through() {
    let out = compile(r#""it\"s" 'a\\b'"#).unwrap();
    assert_eq!(out.params, vec![r#"it\"s"#, r"a\\b"]);
}

#[test]
fn long_queries_render() {
    let input = vec!["w"; 5_000].join(" and ");
    let out = compile(&input).unwrap();
    assert_eq!(out.params.len(), 5_000);
}
