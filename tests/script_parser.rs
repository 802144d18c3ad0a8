use fallible_iterator::FallibleIterator;

use sql_script_parser::dialect::{DatabaseType, Dialect};
use sql_script_parser::lexer::sql::{Context, Error};
use sql_script_parser::SqlScriptParser;

const SCRIPT: &str = "\
-- schema
CREATE TABLE account (id INTEGER, name VARCHAR(20)); -- accounts
INSERT INTO account VALUES (1, 'semi;colon');
INSERT INTO account VALUES (2, 'it''s');
/* cleanup; later */
SELECT /*+ FULL(account) */ COUNT(*) FROM account;
";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn split_script() {
    init_logger();
    let parser = SqlScriptParser::default();
    let statements = parser.split(SCRIPT);
    assert_eq!(
        vec![
            "-- schema\nCREATE TABLE account (id INTEGER, name VARCHAR(20))",
            " -- accounts\nINSERT INTO account VALUES (1, 'semi;colon')",
            "\nINSERT INTO account VALUES (2, 'it''s')",
            "\n/* cleanup; later */\nSELECT /*+ FULL(account) */ COUNT(*) FROM account",
        ],
        statements
    );
}

#[test]
fn split_then_remove_comments() {
    init_logger();
    let parser = SqlScriptParser::default();
    let cleaned: Vec<String> = parser
        .split(SCRIPT)
        .into_iter()
        .filter_map(|statement| parser.remove_comments(statement))
        .map(|statement| statement.trim().to_owned())
        .collect();
    assert_eq!(
        vec![
            "CREATE TABLE account (id INTEGER, name VARCHAR(20))",
            "INSERT INTO account VALUES (1, 'semi;colon')",
            "INSERT INTO account VALUES (2, 'it''s')",
            "SELECT /*+ FULL(account) */ COUNT(*) FROM account",
        ],
        cleaned
    );
}

#[test]
fn rejoined_statements_keep_the_script() {
    let parser = SqlScriptParser::default();
    let script = "SELECT 1; SELECT 'a;b' ;\n-- c;\nSELECT 3";
    let statements = parser.split(script);
    assert_eq!(
        vec!["SELECT 1", " SELECT 'a;b' ", "\n-- c;\nSELECT 3"],
        statements
    );
    assert_eq!(script, statements.join(";"));
}

#[test]
fn remove_comments_is_identity_without_comments() {
    let parser = SqlScriptParser::default();
    for sql in [
        "SELECT 1",
        "SELECT a / b - c FROM t WHERE x = 'y'",
        "UPDATE t SET s = \"a;b\"",
        "",
    ] {
        assert_eq!(Some(sql), parser.remove_comments(sql).as_deref());
    }
}

#[test]
fn dialect_driven_parsers() {
    init_logger();
    let sql = "SELECT 1 from test where t='\\'||t=a;SELECT 2";
    let oracle = SqlScriptParser::for_dialect(&DatabaseType::Oracle);
    assert_eq!(
        vec!["SELECT 1 from test where t='\\'||t=a", "SELECT 2"],
        oracle.split(sql)
    );
    let mysql = SqlScriptParser::for_database("MySQL").unwrap();
    assert_eq!(vec![sql], mysql.split(sql));

    let hive = DatabaseType::from_name("hive2").unwrap();
    assert_eq!("SELECT COUNT(1) FROM t", hive.select_count_statement("t"));
}

#[test]
fn strict_scanning() {
    let parser = SqlScriptParser::default();
    assert_eq!(Ok(()), parser.check(SCRIPT));
    let err = parser.check("SELECT 1;\n\n  /* never closed").unwrap_err();
    assert!(matches!(err, Error::UnterminatedBlockComment(Some(pos)) if pos.line == 3 && pos.column == 3));

    let statements: Result<Vec<_>, _> = parser.strict_statements(SCRIPT).collect();
    assert_eq!(4, statements.unwrap().len());
}

#[test]
fn tokens() {
    let parser = SqlScriptParser::default();
    let hints: Vec<&str> = parser
        .tokens(SCRIPT)
        .filter(|token| Ok(token.token_type.context == Context::HintComment))
        .map(|token| Ok(token.text))
        .collect()
        .unwrap();
    assert_eq!(vec!["/*+ FULL(account) */"], hints);
}
