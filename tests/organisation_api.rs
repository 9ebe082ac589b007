mod common;

use axum::http::StatusCode;
use common::{uuid_of, TestApp};
use serde_json::{json, Value};

fn names(list: &Value) -> Vec<String> {
    let mut names: Vec<String> = list["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn create_then_read_round_trips_fields() {
    let t = TestApp::new();
    let input = json!({
        "name": "Acme",
        "roles": ["SUPPLIER"],
        "emailAddress": "info@acme.example",
        "customerNumber": "C-1",
        "phoneNumber": "+47 1234",
        "address1": "Street 1",
        "address2": "Floor 2",
        "postalCode": "0150",
        "city": "Oslo",
        "state": "Oslo",
        "countryCode": "NO",
        "validated": true
    });
    let (status, created) = t.post("/api/v1/organisations", input.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["category"], "organisations");
    assert_eq!(created["type"], "OrganisationV1");
    for key in ["name", "emailAddress", "customerNumber", "phoneNumber", "address1", "address2", "postalCode", "city", "state", "countryCode", "validated"] {
        assert_eq!(created[key], input[key], "{}", key);
    }
    assert_eq!(created["roles"], json!(["SUPPLIER", "CUSTOMER"]));
    assert_eq!(created["supplierUuid"], Value::Null);
    assert!(created["createdAt"].is_string());
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let (status, read) = t.get(&format!("/api/v1/organisations/{}", uuid_of(&created))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read, created);
}

#[tokio::test]
async fn customer_role_is_always_added() {
    let t = TestApp::new();
    let (_, body) = t
        .post("/api/v1/organisations", json!({"name": "Plain", "city": "Oslo", "countryCode": "NO"}))
        .await;
    assert_eq!(body["roles"], json!(["CUSTOMER"]));
    assert_eq!(body["validated"], false);

    let id = uuid_of(&body);
    let (status, updated) = t
        .put(&format!("/api/v1/organisations/{}", id), json!({"roles": ["BROKER"]}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["roles"], json!(["BROKER", "CUSTOMER"]));
}

#[tokio::test]
async fn duplicate_name_and_country_conflicts() {
    let t = TestApp::new();
    t.organisation("Acme", "NO", &[]).await;
    let (status, body) = t
        .post("/api/v1/organisations", json!({"name": "Acme", "city": "Bergen", "countryCode": "NO"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Organisation already exist, please supply another name"}));

    t.organisation("Acme", "SE", &[]).await;
    let (_, list) = t.get("/api/v1/organisations").await;
    assert_eq!(list["count"], 2);
}

#[tokio::test]
async fn update_into_existing_key_conflicts() {
    let t = TestApp::new();
    t.organisation("Acme", "NO", &[]).await;
    let other = t.organisation("Other", "NO", &[]).await;
    let (status, body) = t
        .put(&format!("/api/v1/organisations/{}", other), json!({"name": "Acme"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Organisation already exist, please supply another name");

    let (status, _) = t
        .put(&format!("/api/v1/organisations/{}", other), json!({"name": "Other", "city": "Tromsø"}))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn validation_errors_are_accumulated() {
    let t = TestApp::new();
    let (status, body) = t
        .post(
            "/api/v1/organisations",
            json!({"roles": ["OVERLORD"], "countryCode": "NOR", "emailAddress": "nope"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["name"], json!(["Missing data for required field."]));
    assert_eq!(body["city"], json!(["Missing data for required field."]));
    assert_eq!(body["countryCode"], json!(["Longer than maximum length 2."]));
    assert_eq!(body["emailAddress"], json!(["Not a valid email address."]));
    assert_eq!(
        body["roles"],
        json!(["Must be one of: PLATFORM_OPERATOR, CUSTOMER, SUPPLIER, RESELLER, BROKER."])
    );
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let t = TestApp::new();
    let (status, body) = t.post("/api/v1/organisations", json!([1, 2])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/organisations")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = t.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_envelope() {
    let t = TestApp::new();
    t.organisation("A", "NO", &[]).await;
    t.organisation("B", "NO", &[]).await;
    let (status, body) = t.get("/api/v1/organisations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "organisations");
    assert_eq!(body["type"], "OrganisationListV1");
    assert_eq!(body["count"], 2);
    assert_eq!(body["total"], 2);
    assert_eq!(body["start"], 1);
    assert_eq!(body["members"][0]["type"], "OrganisationV1");
}

#[tokio::test]
async fn suppliers_only_filters_by_role() {
    let t = TestApp::new();
    t.organisation("Plain", "NO", &[]).await;
    t.organisation("Vendor", "NO", &["SUPPLIER"]).await;
    t.organisation("Operator", "NO", &["PLATFORM_OPERATOR"]).await;
    t.organisation("Reseller", "NO", &["RESELLER", "BROKER"]).await;

    let (_, body) = t.get("/api/v1/organisations?suppliersOnly=true").await;
    assert_eq!(names(&body), vec!["Operator", "Vendor"]);
    assert_eq!(body["count"], 2);

    let (_, body) = t.get("/api/v1/organisations?suppliersOnly=false").await;
    assert_eq!(body["count"], 4);
    let (_, body) = t.get("/api/v1/organisations?suppliersOnly=").await;
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let t = TestApp::new();
    let (_, created) = t
        .post(
            "/api/v1/organisations",
            json!({"name": "Acme", "city": "Oslo", "countryCode": "NO", "phoneNumber": "123"}),
        )
        .await;
    let id = uuid_of(&created);
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, updated) = t
        .put(&format!("/api/v1/organisations/{}", id), json!({"city": "Bergen", "uuid": "ignored"}))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["city"], "Bergen");
    assert_eq!(updated["uuid"], created["uuid"]);
    assert_eq!(updated["phoneNumber"], "123");
    assert_eq!(updated["name"], "Acme");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn update_validates_supplied_fields() {
    let t = TestApp::new();
    let id = t.organisation("Acme", "NO", &[]).await;
    let (status, body) = t
        .put(&format!("/api/v1/organisations/{}", id), json!({"name": null, "validated": "maybe"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["name"], json!(["Field may not be null."]));
    assert_eq!(body["validated"], json!(["Not a valid boolean."]));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let t = TestApp::new();
    let missing = uuid::Uuid::new_v4();
    for uri in [
        format!("/api/v1/organisations/{}", missing),
        "/api/v1/organisations/not-a-uuid".to_string(),
        format!("/api/v1/organisations/{}/users", missing),
        format!("/api/v1/organisations/{}/customers", missing),
    ] {
        let (status, body) = t.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, json!({"error": "organisation not found"}));
    }
    let (status, _) = t
        .put(&format!("/api/v1/organisations/{}", missing), json!({"city": "Oslo"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_twice_is_not_found() {
    let t = TestApp::new();
    let id = t.organisation("Acme", "NO", &[]).await;
    let (status, body) = t.delete(&format!("/api/v1/organisations/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    let (status, body) = t.delete(&format!("/api/v1/organisations/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "organisation not found");
}

#[tokio::test]
async fn delete_is_refused_while_referenced() {
    let t = TestApp::new();
    let org = t.organisation("Acme", "NO", &[]).await;
    let user = t.user(&org, "ada@acme.example").await;

    let (status, body) = t.delete(&format!("/api/v1/organisations/{}", org)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "organisation is still referenced by users");

    t.delete(&format!("/api/v1/users/{}", user)).await;
    let (status, _) = t.delete(&format!("/api/v1/organisations/{}", org)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn users_and_customers_sub_listings() {
    let t = TestApp::new();
    let vendor = t.organisation("Vendor", "NO", &["SUPPLIER"]).await;
    let other = t.organisation("Other", "NO", &[]).await;
    t.user(&vendor, "a@vendor.example").await;
    t.user(&vendor, "b@vendor.example").await;
    t.user(&other, "c@other.example").await;

    let (status, body) = t
        .post(
            "/api/v1/organisations",
            json!({"name": "Client", "city": "Oslo", "countryCode": "NO", "supplierUuid": vendor}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["supplierUuid"], vendor.as_str());

    let (status, users) = t.get(&format!("/api/v1/organisations/{}/users", vendor)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users["category"], "organisations");
    assert_eq!(users["type"], "UserListV1");
    assert_eq!(users["count"], 2);
    assert!(users["members"][0].get("organisation").is_none());

    let (status, customers) = t.get(&format!("/api/v1/organisations/{}/customers", vendor)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(customers["type"], "OrganisationListV1");
    assert_eq!(names(&customers), vec!["Client"]);

    let (_, none) = t.get(&format!("/api/v1/organisations/{}/customers", other)).await;
    assert_eq!(none["count"], 0);
    assert_eq!(none["members"], json!([]));
}

#[tokio::test]
async fn supplier_reference_is_checked() {
    let t = TestApp::new();
    let (status, body) = t
        .post(
            "/api/v1/organisations",
            json!({"name": "Client", "city": "Oslo", "countryCode": "NO",
                   "supplierUuid": uuid::Uuid::new_v4().to_string()}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["supplierUuid"], json!(["Referenced organisation does not exist."]));

    let id = t.organisation("Acme", "NO", &[]).await;
    let (status, body) = t
        .put(&format!("/api/v1/organisations/{}", id), json!({"supplierUuid": id}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["supplierUuid"], json!(["An organisation cannot be its own supplier."]));
}

#[tokio::test]
async fn supplier_can_be_cleared() {
    let t = TestApp::new();
    let vendor = t.organisation("Vendor", "NO", &["SUPPLIER"]).await;
    let (_, client) = t
        .post(
            "/api/v1/organisations",
            json!({"name": "Client", "city": "Oslo", "countryCode": "NO", "supplierUuid": vendor}),
        )
        .await;
    let (status, body) = t
        .put(&format!("/api/v1/organisations/{}", uuid_of(&client)), json!({"supplierUuid": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supplierUuid"], Value::Null);
}

#[tokio::test]
async fn trailing_slash_is_optional() {
    let t = TestApp::new();
    let id = t.organisation("Acme", "NO", &[]).await;
    let (status, body) = t.get("/api/v1/organisations/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    let (status, _) = t.get(&format!("/api/v1/organisations/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn probes() {
    let t = TestApp::new();
    let (status, body) = t.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, body) = t.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "ok");
    let (status, body) = t.get("/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "party-registry");
}
