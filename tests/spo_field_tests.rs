use httpmock::prelude::*;
use serde_json::json;

use m365_cli::cli::spo::{field_list, FieldListOptions};
use m365_cli::M365Client;

fn fields() -> serde_json::Value {
    json!([
        {"Id": "03e45e84-1992-4d42-9116-26f756012634", "Title": "Content Type ID", "InternalName": "ContentTypeId", "Hidden": true, "Group": "_Hidden"},
        {"Id": "fa564e0f-0c70-4ab9-b863-0177e6ddd247", "Title": "Title", "InternalName": "Title", "Hidden": false, "Group": "Custom Columns"}
    ])
}

fn opts(server: &MockServer) -> FieldListOptions {
    FieldListOptions {
        web_url: server.url("/sites/portal"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_site_columns() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/sites/portal/_api/web/fields")
                .header("accept", "application/json;odata=nometadata");
            then.status(200).json_body(json!({"value": fields()}));
        })
        .await;

    let client = M365Client::with_token(&server.base_url(), "token").unwrap();
    let result = field_list(&client, &opts(&server)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result, fields());
}

#[tokio::test]
async fn test_list_columns_by_title() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/sites/portal/_api/web/lists/getByTitle(")
                .path_contains("Documents")
                .path_contains(")/fields");
            then.status(200).json_body(json!({"value": fields()}));
        })
        .await;

    let client = M365Client::with_token(&server.base_url(), "token").unwrap();
    let mut o = opts(&server);
    o.list_title = Some("Documents".to_string());
    let result = field_list(&client, &o).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_columns_by_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/_api/web/lists(guid")
                .path_contains("3c0e9e00-8fcc-479f-9d8d-3447cda34c5b");
            then.status(200).json_body(json!({"value": fields()}));
        })
        .await;

    let client = M365Client::with_token(&server.base_url(), "token").unwrap();
    let mut o = opts(&server);
    o.list_id = Some("3c0e9e00-8fcc-479f-9d8d-3447cda34c5b".to_string());
    field_list(&client, &o).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_columns_by_url() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/sites/portal/_api/web/GetList(")
                .path_contains("test")
                .path_contains(")/fields");
            then.status(200).json_body(json!({"value": fields()}));
        })
        .await;

    let client = M365Client::with_token(&server.base_url(), "token").unwrap();
    let mut o = opts(&server);
    o.list_url = Some("test".to_string());
    field_list(&client, &o).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_select_filter_and_paging() {
    let server = MockServer::start_async().await;
    let next = server.url("/sites/portal/next-page");
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/sites/portal/_api/web/fields")
                .query_param("$select", "Id,Title")
                .query_param("$filter", "Group eq 'Custom & Hidden'");
            then.status(200).json_body(json!({
                "value": [fields()[0].clone()],
                "odata.nextLink": next
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path("/sites/portal/next-page");
            then.status(200).json_body(json!({"value": [fields()[1].clone()]}));
        })
        .await;

    let client = M365Client::with_token(&server.base_url(), "token").unwrap();
    let mut o = opts(&server);
    o.properties = Some("Id,Title".to_string());
    o.filter = Some("Group eq 'Custom & Hidden'".to_string());
    let result = field_list(&client, &o).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(result, fields());
}

#[tokio::test]
async fn test_list_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/_api/web/lists/getByTitle(");
            then.status(404).json_body(json!({
                "odata.error": {
                    "code": "-1, System.ArgumentException",
                    "message": {
                        "lang": "en-US",
                        "value": "List 'Documents' does not exist at site with URL 'https://contoso.sharepoint.com/sites/portal'."
                    }
                }
            }));
        })
        .await;

    let client = M365Client::with_token(&server.base_url(), "token").unwrap();
    let mut o = opts(&server);
    o.list_title = Some("Documents".to_string());
    let err = field_list(&client, &o).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "List 'Documents' does not exist at site with URL 'https://contoso.sharepoint.com/sites/portal'."
    );
}
