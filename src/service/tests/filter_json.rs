//! JSON filter behaviour, including the C# plugin's documented examples.

use crate::service::utils::{filter_json, FilterError};

#[test]
fn filter_matches_csharp_examples() {
    let json = r#"
        {
            "Stores": ["Lambton Quay",  "Willis Street"],
            "Manufacturers": [{
                "Name": "Acme Co",
                "Products": [{ "Name": "Anvil", "Price": 50 }]
            },{
                "Name": "Contoso",
                "Products": [
                    { "Name": "Elbow Grease", "Price": 99.95 },
                    { "Name": "Headlight Fluid", "Price": 4 }
                ]
            }]
        }
        "#;

    assert_eq!(
        r#"["Acme Co"]"#,
        String::from_utf8(filter_json(json, Some("$.Manufacturers[0].Name")).unwrap()).unwrap()
    );
    assert_eq!(
        "[50]",
        String::from_utf8(
            filter_json(json, Some("$.Manufacturers[0].Products[0].Price")).unwrap()
        )
        .unwrap()
    );
    assert_eq!(
        r#"["Elbow Grease"]"#,
        String::from_utf8(
            filter_json(json, Some("$.Manufacturers[1].Products[0].Name")).unwrap()
        )
        .unwrap()
    );
    assert_eq!(
        r#"[{"Name":"Elbow Grease","Price":99.95}]"#,
        String::from_utf8(filter_json(json, Some("$.Manufacturers[1].Products[0]")).unwrap())
            .unwrap()
    );
}

#[test]
fn empty_filter_passes_body_through() {
    let body = "not even json";
    assert_eq!(filter_json(body, None).unwrap(), body.as_bytes());
    assert_eq!(filter_json(body, Some("")).unwrap(), body.as_bytes());
}

#[test]
fn wildcard_collects_all_elements() {
    let json = r#"{"Stores": ["Lambton Quay", "Willis Street"]}"#;
    assert_eq!(
        r#"["Lambton Quay","Willis Street"]"#,
        String::from_utf8(filter_json(json, Some("$.Stores[*]")).unwrap()).unwrap()
    );
    assert_eq!(
        r#"[["Lambton Quay","Willis Street"]]"#,
        String::from_utf8(filter_json(json, Some("$.*")).unwrap()).unwrap()
    );
}

#[test]
fn bracket_member_access() {
    let json = r#"{"a b": 1}"#;
    assert_eq!(
        "[1]",
        String::from_utf8(filter_json(json, Some("$['a b']")).unwrap()).unwrap()
    );
    assert_eq!(
        "[1]",
        String::from_utf8(filter_json(json, Some(r#"$["a b"]"#)).unwrap()).unwrap()
    );
}

#[test]
fn root_index_on_array_body() {
    let json = r#"[10, 20, 30]"#;
    assert_eq!(
        "[20]",
        String::from_utf8(filter_json(json, Some("$[1]")).unwrap()).unwrap()
    );
}

#[test]
fn zero_matches_is_an_error() {
    let json = r#"{"a": 1}"#;
    assert!(matches!(
        filter_json(json, Some("$.missing")),
        Err(FilterError::NoMatch)
    ));
}

#[test]
fn invalid_body_is_an_error() {
    assert!(matches!(
        filter_json("not json", Some("$.a")),
        Err(FilterError::Json(_))
    ));
}

#[test]
fn invalid_selector_is_an_error() {
    let json = r#"{"a": 1}"#;
    assert!(matches!(
        filter_json(json, Some("a.b")),
        Err(FilterError::Syntax(_))
    ));
    assert!(matches!(
        filter_json(json, Some("$.a[")),
        Err(FilterError::Syntax(_))
    ));
    assert!(matches!(
        filter_json(json, Some("$.a[x]")),
        Err(FilterError::Syntax(_))
    ));
}

#[test]
fn overly_deep_selector_is_rejected() {
    let json = r#"{"a": 1}"#;
    let deep = format!("${}", ".a".repeat(65));
    assert!(matches!(
        filter_json(json, Some(&deep)),
        Err(FilterError::TooDeep)
    ));
}
