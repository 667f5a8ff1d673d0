use serde::Serialize;
use serde_datafmt::{
    csv, csv_by_column, csv_by_row, json, json_array, normalize_keys, to_csv, to_csv_value,
    to_json, to_json_pretty, to_toml, to_value, to_yaml, toml, value, yaml, yaml_array,
    CsvOptions, Delimiter, Format, Key, Mapping, Number, Value,
};

fn rabbit_hole() -> Value {
    value!({
        "foo": "bar",
        "one": 1,
        "true": true,
        "down": {"the": {"rabbit": {"hole": true}}}
    })
}

fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}

fn by_args(args: &[&str]) -> (CsvOptions, String) {
    let (options, data) = CsvOptions::from_args(args).unwrap();
    (options, data.to_string())
}

#[test]
fn test_unmarshal_object() {
    let expected_foo = value!({"bar": "baz"});

    for decoded in [
        json(r#"{"foo":{"bar":"baz"},"one":1.0,"true":true}"#).unwrap(),
        normalize_keys(yaml("foo:\n  bar: baz\none: 1.0\ntrue: true\n").unwrap()).unwrap(),
    ] {
        assert_eq!(decoded.get("foo"), Some(&expected_foo));
        assert_eq!(decoded.get("one"), Some(&Value::Number(Number::Float(1.0))));
        assert_eq!(decoded.get("true"), Some(&Value::Bool(true)));
    }
}

#[test]
fn test_unmarshal_array() {
    for decoded in [
        json_array(r#"["foo","bar"]"#).unwrap(),
        yaml_array("\n- foo\n- bar\n").unwrap(),
    ] {
        let items = decoded.as_sequence().unwrap();
        assert_eq!(items[0], Value::from("foo"));
        assert_eq!(items[1], Value::from("bar"));
    }
}

#[test]
fn test_to_json() {
    assert_eq!(
        to_json(&rabbit_hole()).unwrap(),
        r#"{"down":{"the":{"rabbit":{"hole":true}}},"foo":"bar","one":1,"true":true}"#
    );
}

#[test]
fn test_to_json_pretty() {
    let expected = r#"{
  "down": {
    "the": {
      "rabbit": {
        "hole": true
      }
    }
  },
  "foo": "bar",
  "one": 1,
  "true": true
}"#;
    assert_eq!(to_json_pretty("  ", &rabbit_hole()).unwrap(), expected);
}

#[test]
fn test_to_yaml() {
    let expected = r#"d: !!timestamp 2006-01-02T15:04:05.999999999-07:00
foo: bar
? |-
  multi
  line
  key
: hello: world
one: 1
"true": true
"#;
    let d = chrono::DateTime::parse_from_rfc3339("2006-01-02T15:04:05.999999999-07:00").unwrap();
    let mut map = Mapping::new();
    map.insert("foo", Value::from("bar"));
    map.insert("one", Value::from(1));
    map.insert("true", Value::Bool(true));
    map.insert("multi\nline\nkey", value!({"hello": "world"}));
    map.insert("d", Value::Timestamp(d));

    assert_eq!(to_yaml(&Value::Mapping(map)).unwrap(), expected);
}

#[test]
fn test_to_toml() {
    let expected = r#"foo = "bar"
one = 1
true = true

[down]
  [down.the]
    [down.the.rabbit]
      hole = true
"#;
    assert_eq!(to_toml(&rabbit_hole()).unwrap(), expected);
}

#[test]
fn test_toml_example_document() {
    let text = r#"# This is a TOML document. Boom.

title = "TOML Example"

[owner]
name = "Tom Preston-Werner"
organization = "GitHub"
bio = "GitHub Cofounder & CEO\nLikes tater tots and beer."
dob = 1979-05-27T07:32:00Z # First class dates? Why not?

[database]
server = "192.168.1.1"
ports = [ 8001, 8001, 8002 ]
connection_max = 5000
enabled = true

[servers]

  # You can indent as you please. Tabs or spaces. TOML don't care.
  [servers.alpha]
  ip = "10.0.0.1"
  dc = "eqdc10"

  [servers.beta]
  ip = "10.0.0.2"
  dc = "eqdc10"

[clients]
data = [ ["gamma", "delta"], [1, 2] ] # just an update to make sure parsers support it

# Line breaks are OK when inside arrays
hosts = [
  "alpha",
  "omega"
]
"#;
    let dob = chrono::DateTime::parse_from_rfc3339("1979-05-27T07:32:00Z").unwrap();
    let mut owner = Mapping::new();
    owner.insert("name", Value::from("Tom Preston-Werner"));
    owner.insert("organization", Value::from("GitHub"));
    owner.insert(
        "bio",
        Value::from("GitHub Cofounder & CEO\nLikes tater tots and beer."),
    );
    owner.insert("dob", Value::Timestamp(dob));

    let mut expected = Mapping::new();
    expected.insert("title", Value::from("TOML Example"));
    expected.insert("owner", Value::Mapping(owner));
    expected.insert(
        "database",
        value!({
            "server": "192.168.1.1",
            "ports": [8001, 8001, 8002],
            "connection_max": 5000,
            "enabled": true
        }),
    );
    expected.insert(
        "servers",
        value!({
            "alpha": {"ip": "10.0.0.1", "dc": "eqdc10"},
            "beta": {"ip": "10.0.0.2", "dc": "eqdc10"}
        }),
    );
    expected.insert(
        "clients",
        value!({
            "data": [["gamma", "delta"], [1, 2]],
            "hosts": ["alpha", "omega"]
        }),
    );

    let decoded = toml(text).unwrap();
    assert_eq!(decoded, Value::Mapping(expected));

    let ports = decoded.get("database").and_then(|d| d.get("ports")).unwrap();
    assert!(matches!(
        ports.as_sequence().unwrap()[0],
        Value::Number(Number::Integer(8001))
    ));
}

#[test]
fn test_csv() {
    let expected = matrix(&[&["first", "second", "third"], &["1", "2", "3"], &["4", "5", "6"]]);

    let (options, data) = by_args(&["first,second,third\n1,2,3\n4,5,6"]);
    assert_eq!(csv(&data, &options).unwrap(), expected);

    let (options, data) = by_args(&[";", "first;second;third\r\n1;2;3\r\n4;5;6\r\n"]);
    assert_eq!(csv(&data, &options).unwrap(), expected);

    let options = CsvOptions::new();
    assert_eq!(csv("", &options).unwrap(), vec![Vec::<String>::new()]);
    assert_eq!(csv("\n", &options).unwrap(), vec![Vec::<String>::new()]);
    assert_eq!(csv("foo", &options).unwrap(), matrix(&[&["foo"]]));
}

#[test]
fn test_csv_by_row() {
    let expected = value!([
        {"first": "1", "second": "2", "third": "3"},
        {"first": "4", "second": "5", "third": "6"}
    ]);

    for args in [
        &["first,second,third\n1,2,3\n4,5,6"][..],
        &["first,second,third", "1,2,3\n4,5,6"][..],
        &[";", "first;second;third", "1;2;3\n4;5;6"][..],
        &[";", "first;second;third\r\n1;2;3\r\n4;5;6"][..],
    ] {
        let (options, data) = by_args(args);
        assert_eq!(csv_by_row(&data, &options).unwrap(), expected, "{:?}", args);
    }

    let (options, data) = by_args(&["", "1,2,3\n4,5,6"]);
    assert_eq!(
        csv_by_row(&data, &options).unwrap(),
        value!([{"A": "1", "B": "2", "C": "3"}, {"A": "4", "B": "5", "C": "6"}])
    );
}

#[test]
fn test_csv_by_row_wide_auto_header() {
    let data = vec!["1"; 30].join(",");
    let (options, data) = by_args(&["", data.as_str()]);
    let rows = csv_by_row(&data, &options).unwrap();
    let row = rows.as_sequence().unwrap()[0].as_mapping().unwrap();

    let mut labels: Vec<String> = row.keys().map(ToString::to_string).collect();
    labels.sort();
    let mut expected: Vec<String> = "ABCDEFGHIJKLMNOPQRSTUVWXYZ"
        .chars()
        .map(String::from)
        .chain(["AA", "BB", "CC", "DD"].map(String::from))
        .collect();
    expected.sort();
    assert_eq!(labels, expected);
    assert!(row.values().all(|v| v == &Value::from("1")));
}

#[test]
fn test_csv_by_column() {
    let expected = value!({
        "first": ["1", "4"],
        "second": ["2", "5"],
        "third": ["3", "6"]
    });

    for args in [
        &["first,second,third\n1,2,3\n4,5,6"][..],
        &["first,second,third", "1,2,3\n4,5,6"][..],
        &[";", "first;second;third", "1;2;3\n4;5;6"][..],
        &[";", "first;second;third\r\n1;2;3\r\n4;5;6"][..],
    ] {
        let (options, data) = by_args(args);
        assert_eq!(csv_by_column(&data, &options).unwrap(), expected, "{:?}", args);
    }

    let (options, data) = by_args(&["", "1,2,3\n4,5,6"]);
    assert_eq!(
        csv_by_column(&data, &options).unwrap(),
        value!({"A": ["1", "4"], "B": ["2", "5"], "C": ["3", "6"]})
    );
}

#[test]
fn test_auto_index() {
    use serde_datafmt::auto_index;

    assert_eq!(auto_index(0), "A");
    assert_eq!(auto_index(1), "B");
    assert_eq!(auto_index(25), "Z");
    assert_eq!(auto_index(26), "AA");
    assert_eq!(auto_index(51), "ZZ");
    assert_eq!(auto_index(52), "AAA");
    assert_eq!(auto_index(128), "YYYYY");
}

#[test]
fn test_to_csv() {
    let rows = matrix(&[&["first", "second", "third"], &["1", "2", "3"], &["4", "5", "6"]]);
    assert_eq!(
        to_csv(&rows, Delimiter::default()).unwrap(),
        "first,second,third\r\n1,2,3\r\n4,5,6\r\n"
    );
    assert_eq!(
        to_csv(&rows, Delimiter::SEMICOLON).unwrap(),
        "first;second;third\r\n1;2;3\r\n4;5;6\r\n"
    );
}

#[test]
fn test_to_csv_value() {
    let value = value!([["a", "b"], [1, true]]);
    assert_eq!(
        to_csv_value(&value, Delimiter::PIPE).unwrap(),
        "a|b\r\n1|true\r\n"
    );
}

#[test]
fn test_csv_argument_errors() {
    let err = CsvOptions::from_args(&[]).unwrap_err();
    assert!(!err.is_parse());
    assert_eq!(err.format(), None);
    assert!(CsvOptions::from_args(&["é", "h", "d"]).is_err());
}

#[test]
fn test_parse_errors_carry_format() {
    let cases = [
        (json("{\"a\":").unwrap_err(), Format::Json),
        (yaml("a: [").unwrap_err(), Format::Yaml),
        (toml("a = ").unwrap_err(), Format::Toml),
    ];
    for (err, format) in cases {
        assert!(err.is_parse(), "{}", err);
        assert_eq!(err.format(), Some(format));
    }
}

#[test]
fn test_wrong_root_kind() {
    assert!(json("[]").unwrap_err().is_parse());
    assert!(json_array("{}").unwrap_err().is_parse());
    assert!(yaml("- a").unwrap_err().is_parse());
    assert!(yaml_array("a: b").unwrap_err().is_parse());
}

#[test]
fn test_toml_rejects_non_mapping_root() {
    let err = to_toml(&value!([1, 2])).unwrap_err();
    assert!(err.is_encode());
    assert_eq!(err.format(), Some(Format::Toml));
}

#[test]
fn test_composite_key_cannot_be_normalized() {
    let mut map = Mapping::new();
    map.insert(Key::Composite(Box::new(value!(["a", "b"]))), Value::from(1));
    let value = Value::Mapping(map);

    assert!(to_json(&value).unwrap_err().is_encode());
    assert_eq!(
        serde_datafmt::yaml::to_string(&value).unwrap(),
        "? - a\n  - b\n: 1\n"
    );

    let decoded = serde_datafmt::yaml::decode("? - a\n  - b\n: 1\n").unwrap();
    assert_eq!(decoded, value);
}

#[derive(Serialize)]
struct Service {
    name: String,
    replicas: u32,
    ports: Vec<u16>,
    labels: Option<Vec<String>>,
}

#[test]
fn test_struct_through_every_format() {
    let value = to_value(&Service {
        name: "api".to_string(),
        replicas: 3,
        ports: vec![80, 443],
        labels: None,
    })
    .unwrap();

    assert_eq!(
        to_json(&value).unwrap(),
        r#"{"labels":null,"name":"api","ports":[80,443],"replicas":3}"#
    );
    assert_eq!(
        to_yaml(&value).unwrap(),
        "labels: null\nname: api\nports:\n- 80\n- 443\nreplicas: 3\n"
    );
    assert_eq!(
        to_toml(&value).unwrap(),
        "name = \"api\"\nports = [80, 443]\nreplicas = 3\n"
    );
}

#[test]
fn test_yaml_to_json_to_toml() {
    let source = "\
name: gateway
limits:
  rps: 250.5
  burst: 10
routes:
- path: /a
  upstream: one
- path: /b
  upstream: two
";
    let value = yaml(source).unwrap();
    let json_text = to_json(&value).unwrap();
    assert_eq!(json(&json_text).unwrap(), value);

    let toml_text = to_toml(&value).unwrap();
    assert_eq!(
        toml_text,
        "name = \"gateway\"

[limits]
  burst = 10.0
  rps = 250.5

[[routes]]
  path = \"/a\"
  upstream = \"one\"

[[routes]]
  path = \"/b\"
  upstream = \"two\"
"
    );
    assert_eq!(toml(&toml_text).unwrap(), value);
}

#[test]
fn test_date_shaped_strings_survive_yaml() {
    let value = json(r#"{"at":"2001-12-14T21:59:43.5+00:00","day":"2002-12-14"}"#).unwrap();
    let yaml_text = to_yaml(&value).unwrap();
    assert_eq!(yaml(&yaml_text).unwrap(), value);
    assert_eq!(
        to_json(&yaml(&yaml_text).unwrap()).unwrap(),
        r#"{"at":"2001-12-14T21:59:43.5+00:00","day":"2002-12-14"}"#
    );

    let tagged = yaml("plain: 2001-12-14T21:59:43Z\nquoted: '2001-12-14T21:59:43Z'\n").unwrap();
    assert!(matches!(tagged.get("plain"), Some(Value::Timestamp(_))));
    assert_eq!(tagged.get("quoted"), Some(&Value::from("2001-12-14T21:59:43Z")));
}
