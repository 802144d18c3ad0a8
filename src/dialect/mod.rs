//! SQL dialects
//!
//! The scanner only needs to know whether backslash escapes are honored in
//! string literals. The rest of a dialect (row count statement shape, ...)
//! is exposed for callers that pick a dialect from a database type name.

use std::fmt;

use uncased::UncasedStr;

/// Dialect specific behaviour of a target database.
pub trait Dialect {
    /// Database type name
    fn name(&self) -> &str;

    /// Whether `\` escapes the next character inside `'...'` and `"..."`
    /// literals.
    fn escapes_enabled(&self) -> bool {
        true
    }

    /// Statement returning the number of rows in `table_name`.
    fn select_count_statement(&self, table_name: &str) -> String {
        format!("SELECT COUNT(*) FROM {table_name}")
    }
}

/// Built-in dialects
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DatabaseType {
    /// ANSI / unknown database
    #[default]
    Generic,
    /// H2
    H2,
    /// Apache Hive
    Hive,
    /// Apache Hive (HiveServer2)
    Hive2,
    /// Cloudera Impala
    Impala,
    /// MariaDB
    MariaDb,
    /// Microsoft SQL Server
    MsSql,
    /// MySQL
    MySql,
    /// Oracle
    Oracle,
    /// Oracle Rdb
    OracleRdb,
    /// PostgreSQL
    PostgreSql,
}

include!(concat!(env!("OUT_DIR"), "/databases.rs"));

impl DatabaseType {
    /// Find the dialect registered under `name` (ignoring case).
    pub fn from_name(name: &str) -> Option<Self> {
        DATABASES.get(UncasedStr::new(name.trim())).copied()
    }

    fn is_oracle_family(self) -> bool {
        matches!(self, Self::Oracle | Self::OracleRdb)
    }

    fn is_hive_family(self) -> bool {
        matches!(self, Self::Hive | Self::Hive2 | Self::Impala)
    }
}

impl Dialect for DatabaseType {
    fn name(&self) -> &str {
        match self {
            Self::Generic => "GENERIC",
            Self::H2 => "H2",
            Self::Hive => "HIVE",
            Self::Hive2 => "HIVE2",
            Self::Impala => "IMPALA",
            Self::MariaDb => "MARIADB",
            Self::MsSql => "MSSQL",
            Self::MySql => "MYSQL",
            Self::Oracle => "ORACLE",
            Self::OracleRdb => "ORACLERDB",
            Self::PostgreSql => "POSTGRESQL",
        }
    }

    fn escapes_enabled(&self) -> bool {
        // Oracle string literals have no escape character: '\' is a literal.
        !self.is_oracle_family()
    }

    fn select_count_statement(&self, table_name: &str) -> String {
        if self.is_hive_family() {
            format!("SELECT COUNT(1) FROM {table_name}")
        } else {
            format!("SELECT COUNT(*) FROM {table_name}")
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::{DatabaseType, Dialect};

    const TABLE_NAME: &str = "NON_EXISTANT";

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Some(DatabaseType::H2), DatabaseType::from_name("H2"));
        assert_eq!(Some(DatabaseType::Oracle), DatabaseType::from_name("oracle"));
        assert_eq!(Some(DatabaseType::MySql), DatabaseType::from_name("MySQL"));
        assert_eq!(Some(DatabaseType::MsSql), DatabaseType::from_name("MSSQLNATIVE"));
        assert_eq!(None, DatabaseType::from_name("DB2000"));
        assert_eq!(None, DatabaseType::from_name(""));
    }

    #[test]
    fn names_round_trip() {
        for name in ["GENERIC", "H2", "HIVE2", "MARIADB", "ORACLERDB", "POSTGRESQL"] {
            let database_type = DatabaseType::from_name(name).unwrap();
            assert_eq!(name, database_type.name());
            assert_eq!(name, database_type.to_string());
        }
    }

    #[test]
    fn select_count() {
        let expected = format!("select count(*) from {TABLE_NAME}");
        for database_type in [DatabaseType::H2, DatabaseType::Oracle, DatabaseType::MySql] {
            let sql = database_type.select_count_statement(TABLE_NAME);
            assert!(sql.eq_ignore_ascii_case(&expected), "{database_type}: {sql}");
        }
        assert_eq!(
            "SELECT COUNT(1) FROM NON_EXISTANT",
            DatabaseType::Hive2.select_count_statement(TABLE_NAME)
        );
    }

    #[test]
    fn oracle_has_no_escapes() {
        assert!(!DatabaseType::Oracle.escapes_enabled());
        assert!(!DatabaseType::OracleRdb.escapes_enabled());
        assert!(DatabaseType::MySql.escapes_enabled());
        assert!(DatabaseType::default().escapes_enabled());
    }

    #[test]
    fn custom_dialect_defaults() {
        struct Derby;
        impl Dialect for Derby {
            fn name(&self) -> &str {
                "DERBY"
            }
        }
        assert!(Derby.escapes_enabled());
        assert_eq!("SELECT COUNT(*) FROM t", Derby.select_count_statement("t"));
    }
}
