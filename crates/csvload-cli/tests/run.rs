//! Full run from a config file into the file sink.

use std::fs;

use csvload_cli::config::LoaderConfig;
use csvload_core::run;
use csvload_sink::FileSink;
use tempfile::TempDir;

const CATALOG: &str = r#"
[[tables]]
name = "Customers"

[[tables.columns]]
name = "RowId"
type = "bigint"

[[tables.columns]]
name = "Id"
type = "int"

[[tables.columns]]
name = "Name"
type = "nvarchar"
max_length = 5

[[tables.columns]]
name = "Amount"
type = "decimal"
precision = 10
scale = 2
"#;

#[test]
fn test_run_writes_json_lines() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("incoming")).unwrap();
    fs::create_dir_all(root.join("warehouse")).unwrap();
    fs::write(root.join("warehouse/catalog.toml"), CATALOG).unwrap();
    fs::write(
        root.join("incoming/clientes_2024.csv"),
        "Id;Name;Amount\n1;Anabela;1.234,56\n2;Luis;\n",
    )
    .unwrap();
    fs::write(
        root.join("csvload.toml"),
        "input_dir = \"incoming\"\nsink_dir = \"warehouse\"\ndelimiter = \"auto\"\n\n\
         [[tables]]\nname = \"Customers\"\npattern = \"clientes_*.csv\"\n",
    )
    .unwrap();

    let config = LoaderConfig::load(&root.join("csvload.toml")).unwrap();
    config.validate().unwrap();
    let mut sink = FileSink::open(&config.sink_dir).unwrap();
    let summary = run(&mut sink, &config.run_request().unwrap()).unwrap();

    assert!(!summary.has_failures());
    assert_eq!(summary.total_rows(), 2);
    let data = fs::read_to_string(root.join("warehouse/dbo.Customers.jsonl")).unwrap();
    assert_eq!(
        data,
        "{\"Id\":1,\"Name\":\"Anabe\",\"Amount\":\"1234.56\"}\n\
         {\"Id\":2,\"Name\":\"Luis\",\"Amount\":null}\n"
    );
}
