//! Tagging and listing behaviour of MaasClient against canned MAAS responses

use maasclient::{FakeTransport, MaasAuth, MaasClient, Method, FPI_TAG};
use serde_json::Value;
use std::sync::Arc;

const API_URL: &str = "http://localhost/MAAS/api/1.0";

const ONE_MACHINE_JSON_NOTAGS: &str = r#"
[   {
        "status": 0,
        "macaddress_set": [
            {
                "resource_uri": "/MAAS/api/1.0/nodes/fake-uri",
                "mac_address": "ec:a8:6b:fb:34:d6"
            }
        ],
        "hostname": "m6mm9.maas",
        "zone": {
            "resource_uri": "/MAAS/api/1.0/zones/default/",
            "name": "default",
            "description": ""
        },
        "routers": [],
        "netboot": false,
        "cpu_count": 4,
        "storage": 115880,
        "owner": "root",
        "system_id": "node-01",
        "architecture": "amd64/generic",
        "memory": 8192,
        "power_type": "amt",
        "tag_names": [
        ],
        "ip_addresses": [
            "10.0.100.4"
        ],
        "resource_uri": "/MAAS/api/1.0/nodes/node-01/"
    }
]
"#;

const TWO_TAGS_JSON: &str = r#"
[
    {
        "comment": "",
        "definition": "true()",
        "resource_uri": "/MAAS/api/1.0/tags/tag1/",
        "name": "tag1",
        "kernel_opts": ""
    },
    {
        "comment": "",
        "definition": "",
        "resource_uri": "/MAAS/api/1.0/tags/tag2/",
        "name": "tag2",
        "kernel_opts": ""
    }
]
"#;

fn client_with(fake: FakeTransport) -> (MaasClient, Arc<FakeTransport>) {
    let fake = Arc::new(fake);
    let auth = MaasAuth::new(Some(API_URL.to_string()), Some("ck:tk:ts")).unwrap();
    (MaasClient::with_transport(auth, Arc::clone(&fake)), fake)
}

fn one_machine() -> Vec<Value> {
    serde_json::from_str(ONE_MACHINE_JSON_NOTAGS).unwrap()
}

/// (method, url suffix, form) for every request sent
fn sent(fake: &FakeTransport) -> Vec<(Method, String, Vec<(String, String)>)> {
    fake.requests()
        .into_iter()
        .map(|r| {
            let path = r.request.url.trim_start_matches(API_URL).to_string();
            (r.request.method, path, r.request.form)
        })
        .collect()
}

fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_get_no_tags() {
    let (c, _) = client_with(FakeTransport::new().with(Method::Get, "/tags/", "[]"));
    assert!(c.tags().unwrap().is_empty());
}

#[test]
fn test_get_tags() {
    let (c, _) = client_with(FakeTransport::new().with(Method::Get, "/tags/", TWO_TAGS_JSON));
    let tags = c.tags().unwrap();
    assert_eq!(tags[0]["name"], "tag1");
    assert_eq!(tags[1]["name"], "tag2");
}

#[test]
fn test_get_nodes() {
    let (c, _) = client_with(
        FakeTransport::new().with(Method::Get, "/nodes/", ONE_MACHINE_JSON_NOTAGS),
    );
    let nodes = c.nodes().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["system_id"], "node-01");
    assert_eq!(nodes[0]["hostname"], "m6mm9.maas");
}

#[test]
fn test_create_tag_existing() {
    let (c, fake) = client_with(
        FakeTransport::new()
            .with(Method::Get, "/tags/", TWO_TAGS_JSON)
            .with(Method::Post, "/tags/", ""),
    );

    assert!(!c.tag_new("tag1").unwrap());
    assert_eq!(fake.call_count(Method::Post), 0);
}

#[test]
fn test_create_tag_nonexisting() {
    let (c, fake) = client_with(
        FakeTransport::new()
            .with(Method::Get, "/tags/", TWO_TAGS_JSON)
            .with(Method::Post, "/tags/", ""),
    );

    assert!(c.tag_new("newtag").unwrap());
    assert_eq!(fake.call_count(Method::Post), 1);

    let posts: Vec<_> = sent(&fake)
        .into_iter()
        .filter(|(m, _, _)| *m == Method::Post)
        .collect();
    assert_eq!(
        posts,
        vec![(
            Method::Post,
            "/tags/".to_string(),
            form(&[("op", "new"), ("name", "newtag")])
        )]
    );
}

#[test]
fn test_tag_name() {
    let (c, fake) = client_with(
        FakeTransport::new()
            .with(Method::Get, "/tags/", TWO_TAGS_JSON)
            .with(Method::Post, "/tags/", "")
            .with(Method::Post, "/tags/node-01/", ""),
    );

    c.tag_name(&one_machine()).unwrap();

    assert_eq!(
        sent(&fake),
        vec![
            (Method::Get, "/tags/".to_string(), Vec::new()),
            (
                Method::Post,
                "/tags/".to_string(),
                form(&[("op", "new"), ("name", "node-01")])
            ),
            (
                Method::Post,
                "/tags/node-01/".to_string(),
                form(&[("op", "update_nodes"), ("add", "node-01")])
            ),
        ]
    );
}

#[test]
fn test_tag_fpi() {
    let fpi_path = format!("/tags/{}/", FPI_TAG);
    let (c, fake) = client_with(
        FakeTransport::new()
            .with(Method::Get, "/tags/", TWO_TAGS_JSON)
            .with(Method::Post, "/tags/", "")
            .with(Method::Post, &fpi_path, ""),
    );

    c.tag_fpi(&one_machine()).unwrap();

    assert_eq!(
        sent(&fake),
        vec![
            (Method::Get, "/tags/".to_string(), Vec::new()),
            (
                Method::Post,
                "/tags/".to_string(),
                form(&[("op", "new"), ("name", FPI_TAG)])
            ),
            (
                Method::Post,
                fpi_path.clone(),
                form(&[("op", "update_nodes"), ("add", "node-01")])
            ),
        ]
    );
}

#[test]
fn test_tag_machine_failure_is_reported() {
    let (c, _) = client_with(FakeTransport::new());
    let err = c.tag_machine("tag1", "node-01").unwrap_err();
    assert!(err.is_invalid_response());
}
