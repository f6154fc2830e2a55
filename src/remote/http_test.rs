use super::*;

#[test]
fn generate_response_keeps_payload_and_svg() {
    let json = json!({
        "classes": [{ "id": "1", "name": "Order" }],
        "relationships": [],
        "svg": "<svg>order</svg>"
    })
    .to_string();
    let generated = parse_generate_response(DiagramKind::Uml, &json).unwrap();
    assert_eq!(generated.artifact, Some(Artifact::new("<svg>order</svg>")));
    assert_eq!(generated.payload["classes"][0]["name"], "Order");
}

#[test]
fn generate_response_without_links_is_rejected() {
    let json = json!({ "entities": [], "svg": "<svg/>" }).to_string();
    let err = parse_generate_response(DiagramKind::Er, &json).unwrap_err();
    assert_eq!(err, RemoteError::Parse("missing entities and relationships".into()));
}

#[test]
fn generate_response_for_flowchart_uses_nodes_and_edges() {
    let json = json!({ "nodes": [], "edges": [] }).to_string();
    let generated = parse_generate_response(DiagramKind::Flowchart, &json).unwrap();
    assert_eq!(generated.artifact, None);
}

#[test]
fn non_object_body_is_parse_error() {
    assert!(matches!(parse_render_response("[1,2]"), Err(RemoteError::Parse(_))));
    assert!(matches!(parse_render_response("not json"), Err(RemoteError::Parse(_))));
}

#[test]
fn render_response_requires_svg() {
    assert_eq!(parse_render_response(r#"{"svg":"<svg/>"}"#).unwrap(), Artifact::new("<svg/>"));
    assert_eq!(parse_render_response(r#"{"svg":""}"#).unwrap_err(), RemoteError::Parse("missing svg".into()));
}

#[test]
fn persist_response_reads_s3_url() {
    let receipt = parse_persist_response(r#"{"s3_url":"https://bucket/x.svg"}"#).unwrap();
    assert_eq!(receipt.stored_location, "https://bucket/x.svg");
}

#[test]
fn history_response_success_false_is_rejected() {
    let err = parse_history_response(r#"{"success":false,"error":"no such user"}"#).unwrap_err();
    assert_eq!(err, RemoteError::Rejected("no such user".into()));
}

#[test]
fn history_response_lists_items() {
    let json = json!({
        "success": true,
        "items": [
            { "diagram_id": "a", "diagram_type": "uml", "created_at": "t1", "link": "v", "s3_link": "s" },
            { "diagram_id": "b", "diagram_type": "er", "created_at": "t2" }
        ]
    })
    .to_string();
    let items = parse_history_response(&json).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].view_link, None);
}

#[test]
fn error_message_prefers_error_then_message() {
    assert_eq!(error_message(r#"{"error":"bad prompt"}"#, 400), "bad prompt");
    assert_eq!(error_message(r#"{"message":"throttled"}"#, 429), "throttled");
    assert_eq!(error_message("<html>", 502), "server returned 502 status");
}

#[test]
fn client_builds_from_config() {
    let config = RemoteConfig {
        base_url: "http://localhost:1".into(),
        paths: crate::remote::config::RemotePaths {
            generate: "/g".into(),
            render: "/r".into(),
            persist: "/p".into(),
            history: "/h".into(),
        },
        timeouts: crate::remote::config::RemoteTimeouts { request_secs: 1, connect_secs: 1 },
    };
    assert!(HttpDiagramService::new(config).is_ok());
}
