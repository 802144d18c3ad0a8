use std::env;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;

use phf_codegen::Map;
use uncased::UncasedStr;

/// Database type names, as found in connection metadata, and the built-in
/// dialect they resolve to.
static DATABASES: &[(&str, &str)] = &[
    ("GENERIC", "DatabaseType::Generic"),
    ("H2", "DatabaseType::H2"),
    ("HIVE", "DatabaseType::Hive"),
    ("HIVE2", "DatabaseType::Hive2"),
    ("IMPALA", "DatabaseType::Impala"),
    ("MARIADB", "DatabaseType::MariaDb"),
    ("MSSQL", "DatabaseType::MsSql"),
    ("MSSQLNATIVE", "DatabaseType::MsSql"),
    ("MYSQL", "DatabaseType::MySql"),
    ("ORACLE", "DatabaseType::Oracle"),
    ("ORACLERDB", "DatabaseType::OracleRdb"),
    ("POSTGRESQL", "DatabaseType::PostgreSql"),
];

fn write_database_hash(out_path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(out_path)?);
    let mut databases = Map::new();
    for (name, database_type) in DATABASES {
        databases.entry(UncasedStr::new(name), *database_type);
    }
    writeln!(
        &mut file,
        "static DATABASES: ::phf::Map<&'static UncasedStr, DatabaseType> = \n{};",
        databases.build()
    )?;
    file.flush()
}

fn main() -> Result<()> {
    let out_dir = env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);
    write_database_hash(&out_path.join("databases.rs"))?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
