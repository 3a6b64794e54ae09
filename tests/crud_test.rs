//! Integration tests for the CRUD façade with inferred routing.

mod common;

use common::RecordingTransport;
use serde_json::json;
use zgw_client::{
    BearerToken, Client, ClientError, PartialUpdate, PathParams, QueryParams, QueryValue,
    RequestOptions, ResourceRef, SchemaRegistry,
};

const BASE_URL: &str = "https://host/api/v1";

fn client(transport: &RecordingTransport) -> Client {
    Client::new(BASE_URL, transport.clone())
}

// === Routing ===

mod routing {
    use super::*;

    #[test]
    fn list_uses_plural_collection() {
        let transport = RecordingTransport::new();
        transport.respond(200, r#"{"count": 0, "next": null, "results": []}"#);

        let page = client(&transport).list("zaak", None).unwrap();

        let request = transport.last();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "zaken");
        assert_eq!(page["count"], 0);
    }

    #[test]
    fn list_passes_query_params() {
        let transport = RecordingTransport::new();
        let mut query = QueryParams::new();
        query.insert("status".into(), QueryValue::from("open"));
        query.insert("page".into(), QueryValue::from("2"));

        client(&transport).list("zaak", Some(&query)).unwrap();

        let request = transport.last().request;
        assert!(request.query.contains(&("status".to_string(), "open".to_string())));
        assert!(request.query.contains(&("page".to_string(), "2".to_string())));
    }

    #[test]
    fn retrieve_by_uuid() {
        let transport = RecordingTransport::new();
        client(&transport)
            .retrieve("catalogus", &ResourceRef::uuid("c1"))
            .unwrap();

        let request = transport.last();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "catalogussen/c1");
    }

    #[test]
    fn retrieve_by_url_keeps_query() {
        let transport = RecordingTransport::new();
        client(&transport)
            .retrieve("zaak", &ResourceRef::url("https://host/api/v1/zaken/z1?expand=rollen"))
            .unwrap();

        let request = transport.last();
        assert_eq!(request.path, "zaken/z1");
        assert_eq!(
            request.request.query,
            vec![("expand".to_string(), "rollen".to_string())]
        );
    }

    #[test]
    fn retrieve_by_url_on_other_service() {
        let transport = RecordingTransport::new();
        client(&transport)
            .retrieve(
                "enkelvoudiginformatieobject",
                &ResourceRef::url("https://documenten.example/api/v1/enkelvoudiginformatieobjecten/d1"),
            )
            .unwrap();

        assert_eq!(transport.last().path, "enkelvoudiginformatieobjecten/d1");
    }

    #[test]
    fn create_posts_json_body() {
        let transport = RecordingTransport::new();
        transport.respond(201, r#"{"url": "https://host/api/v1/rollen/r1"}"#);

        let created = client(&transport)
            .create("rol", &json!({"betrokkeneType": "medewerker"}))
            .unwrap();

        let request = transport.last();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "rollen");
        assert_eq!(request.request.json, Some(json!({"betrokkeneType": "medewerker"})));
        assert_eq!(created["url"], "https://host/api/v1/rollen/r1");
    }

    #[test]
    fn update_puts_full_replacement() {
        let transport = RecordingTransport::new();
        client(&transport)
            .update("zaak", &json!({"omschrijving": "x"}), &ResourceRef::uuid("z1"))
            .unwrap();

        let request = transport.last();
        assert_eq!(request.method, "PUT");
        assert_eq!(request.path, "zaken/z1");
        assert_eq!(request.request.json, Some(json!({"omschrijving": "x"})));
    }

    #[test]
    fn update_url_wins() {
        let transport = RecordingTransport::new();
        client(&transport)
            .update("zaak", &json!({}), &ResourceRef::url("/api/v1/zaken/other"))
            .unwrap();

        assert_eq!(transport.last().path, "zaken/other");
    }

    #[test]
    fn delete_by_uuid_url_and_bare() {
        let transport = RecordingTransport::new();
        transport.respond(204, "").respond(204, "").respond(204, "");
        let client = client(&transport);

        client.delete("rol", Some(&ResourceRef::uuid("r1"))).unwrap();
        client
            .delete("rol", Some(&ResourceRef::url("https://host/api/v1/rollen/r2")))
            .unwrap();
        client.delete("rollen/r3", None).unwrap();

        let paths: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("DELETE", "rollen/r1".to_string()),
                ("DELETE", "rollen/r2".to_string()),
                ("DELETE", "rollen/r3".to_string()),
            ]
        );
    }

    #[test]
    fn nested_params_fill_inferred_template() {
        let transport = RecordingTransport::new();
        client(&transport)
            .retrieve("zaak", &ResourceRef::params([("uuid", "z1"), ("unused", "x")]))
            .unwrap();

        assert_eq!(transport.last().path, "zaken/z1");
    }
}

// === Partial updates ===

mod partial_update {
    use super::*;

    #[test]
    fn patch_by_full_url() {
        let transport = RecordingTransport::new();
        client(&transport)
            .partial_update(
                "document",
                PartialUpdate::new()
                    .data(json!({"locked": true}))
                    .url("https://host/api/v1/documenten/abc"),
            )
            .unwrap();

        let request = transport.last();
        assert_eq!(request.method, "PATCH");
        assert_eq!(request.path, "documenten/abc");
        assert_eq!(request.request.json, Some(json!({"locked": true})));
    }

    #[test]
    fn fields_merge_over_data() {
        let transport = RecordingTransport::new();
        client(&transport)
            .partial_update(
                "zaak",
                PartialUpdate::new()
                    .uuid("z1")
                    .data(json!({"toelichting": "a", "omschrijving": "b"}))
                    .field("toelichting", "c"),
            )
            .unwrap();

        let request = transport.last();
        assert_eq!(request.path, "zaken/z1");
        assert_eq!(
            request.request.json,
            Some(json!({"toelichting": "c", "omschrijving": "b"}))
        );
    }

    #[test]
    fn parent_nests_inferred_path() {
        let transport = RecordingTransport::new();
        client(&transport)
            .partial_update(
                "zaakeigenschap",
                PartialUpdate::new()
                    .parent("zaak", "z1")
                    .uuid("e1")
                    .field("waarde", "42"),
            )
            .unwrap();

        assert_eq!(transport.last().path, "zaken/z1/zaakeigenschappen/e1");
    }

    #[test]
    fn unresolvable_resource_uses_naive_path() {
        let transport = RecordingTransport::new();
        // An empty resource can't be split into `{resource}_{action}`.
        client(&transport)
            .partial_update("", PartialUpdate::new().uuid("x1").field("a", 1))
            .unwrap();

        assert_eq!(transport.last().path, "x1");
    }

    #[test]
    fn empty_response_is_empty_object() {
        let transport = RecordingTransport::new();
        transport.respond(204, "");

        let body = client(&transport)
            .partial_update("zaak", PartialUpdate::new().uuid("z1").field("a", 1))
            .unwrap();
        assert_eq!(body, json!({}));
    }
}

// === Errors ===

mod errors {
    use super::*;

    #[test]
    fn not_found_propagates_body() {
        let transport = RecordingTransport::new();
        transport.respond(404, r#"{"detail": "not found"}"#);

        let err = client(&transport)
            .retrieve("zaak", &ResourceRef::uuid("missing"))
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(&json!({"detail": "not found"})));
    }

    #[test]
    fn errors_are_not_retried() {
        let transport = RecordingTransport::new();
        transport.respond(503, "Service Unavailable");

        let err = client(&transport).list("zaak", None).unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 503, body: None, .. }));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn delete_propagates_errors() {
        let transport = RecordingTransport::new();
        transport.respond(403, r#"{"code": "permission_denied"}"#);

        let err = client(&transport)
            .delete("zaak", Some(&ResourceRef::uuid("z1")))
            .unwrap_err();
        assert_eq!(err.body(), Some(&json!({"code": "permission_denied"})));
    }

    #[test]
    fn partial_update_without_target_sends_nothing() {
        let transport = RecordingTransport::new();
        let err = client(&transport)
            .partial_update("zaak", PartialUpdate::new().field("a", 1))
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::UnresolvableOperation { ref operation_id } if operation_id == "zaak_partial_update"
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn missing_path_params_send_nothing() {
        let transport = RecordingTransport::new();
        let client = client(&transport);

        let err = client
            .retrieve("zaak", &ResourceRef::params(PathParams::new()))
            .unwrap_err();
        assert!(err.is_programming_error());

        let err = client
            .operation("zaak_delete", &PathParams::new(), RequestOptions::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::UnresolvableOperation { .. }));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn unresolvable_operation_sends_nothing() {
        let transport = RecordingTransport::new();
        let result = client(&transport).operation(
            "zaak_archive",
            &PathParams::new(),
            RequestOptions::new(),
        );

        assert!(matches!(result, Err(ClientError::UnresolvableOperation { .. })));
        assert!(transport.requests().is_empty());
    }
}

// === Operations and auth ===

#[test]
fn operation_by_id() {
    let transport = RecordingTransport::new();
    client(&transport)
        .operation(
            "status_create",
            &PathParams::new(),
            RequestOptions::new().data(json!({"statustype": "st"})),
        )
        .unwrap();

    let request = transport.last();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "statussen");
}

#[test]
fn auth_headers_on_every_request() {
    let transport = RecordingTransport::new();
    let client = Client::builder(BASE_URL)
        .transport(transport.clone())
        .auth(BearerToken::new("jwt"))
        .build()
        .unwrap();

    client.list("zaak", None).unwrap();
    client.create("zaak", &json!({})).unwrap();

    for recorded in transport.requests() {
        assert_eq!(recorded.request.header("Authorization"), Some("Bearer jwt"));
    }
}

#[test]
fn unbound_client_has_no_schema() {
    let transport = RecordingTransport::new();
    let client = client(&transport);
    assert!(client.schema().is_none());
    assert!(client.supports_operation("zaak_list"));
    assert!(!client.supports_operation("zaak"));
}

#[test]
fn client_and_registry_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
    assert_send_sync::<SchemaRegistry>();
}
