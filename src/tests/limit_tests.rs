use actix_web::{http::StatusCode, test};
use serde_json::json;

use crate::{
	models::{ApiResponse, Role, UserLimit},
	tests::test_utils::{bearer, generate_test_token, test_app, test_state, MemoryRepo},
};

#[actix_web::test]
async fn test_limits_are_null_until_configured() {
	let repo = MemoryRepo::new();
	let user = repo.seed_user("limits@example.com", Role::User);
	let state = test_state(repo);
	let app = test_app!(state);

	let resp = test::TestRequest::get()
		.uri("/limits")
		.insert_header(bearer(&generate_test_token(user.id, Role::User)))
		.send_request(&app)
		.await;

	assert_eq!(resp.status(), StatusCode::OK);
	let body: serde_json::Value = test::read_body_json(resp).await;
	assert!(body["data"].is_null());
}

#[actix_web::test]
async fn test_upsert_limits_overrides_user_id() {
	let repo = MemoryRepo::new();
	let user = repo.seed_user("limits@example.com", Role::User);
	let state = test_state(repo);
	let app = test_app!(state);
	let token = generate_test_token(user.id, Role::User);

	let resp = test::TestRequest::put()
		.uri("/limits")
		.insert_header(bearer(&token))
		.set_json(&json!({
			"user_id": 999,
			"daily_limit": 100,
			"daily_limit_enabled": true,
			"monthly_limit": "2500.50",
			"monthly_limit_enabled": false
		}))
		.send_request(&app)
		.await;

	assert_eq!(resp.status(), StatusCode::OK);
	let body: ApiResponse<UserLimit> = test::read_body_json(resp).await;
	let saved = body.data.unwrap();
	assert_eq!(saved.user_id, user.id);
	assert!(saved.daily_limit_enabled);
	assert!(!saved.monthly_limit_enabled);

	let fetched = test::TestRequest::get()
		.uri("/limits")
		.insert_header(bearer(&token))
		.send_request(&app)
		.await;
	let body: serde_json::Value = test::read_body_json(fetched).await;
	assert_eq!(body["data"]["daily_limit"], json!(100.0));
	assert_eq!(body["data"]["monthly_limit"], json!(2500.5));
}

#[actix_web::test]
async fn test_negative_limit_is_rejected() {
	let repo = MemoryRepo::new();
	let user = repo.seed_user("limits@example.com", Role::User);
	let state = test_state(repo);
	let app = test_app!(state);

	let resp = test::TestRequest::put()
		.uri("/limits")
		.insert_header(bearer(&generate_test_token(user.id, Role::User)))
		.set_json(&json!({ "daily_limit": -5, "daily_limit_enabled": true }))
		.send_request(&app)
		.await;

	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_limit_must_fit_storage_column() {
	let repo = MemoryRepo::new();
	let user = repo.seed_user("limits@example.com", Role::User);
	let state = test_state(repo);
	let app = test_app!(state);
	let token = generate_test_token(user.id, Role::User);

	for body in [
		json!({ "daily_limit": "0.001", "daily_limit_enabled": true }),
		json!({ "monthly_limit": "1e15", "monthly_limit_enabled": true }),
	] {
		let resp = test::TestRequest::put()
			.uri("/limits")
			.insert_header(bearer(&token))
			.set_json(&body)
			.send_request(&app)
			.await;

		assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", body);
	}
}

#[actix_web::test]
async fn test_delete_limits() {
	let repo = MemoryRepo::new();
	let user = repo.seed_user("limits@example.com", Role::User);
	let state = test_state(repo);
	let app = test_app!(state);
	let token = generate_test_token(user.id, Role::User);

	test::TestRequest::put()
		.uri("/limits")
		.insert_header(bearer(&token))
		.set_json(&json!({ "daily_limit": 50, "daily_limit_enabled": true }))
		.send_request(&app)
		.await;

	let first = test::TestRequest::delete()
		.uri("/limits")
		.insert_header(bearer(&token))
		.send_request(&app)
		.await;
	let second = test::TestRequest::delete()
		.uri("/limits")
		.insert_header(bearer(&token))
		.send_request(&app)
		.await;

	assert_eq!(first.status(), StatusCode::OK);
	assert_eq!(second.status(), StatusCode::NOT_FOUND);
}
