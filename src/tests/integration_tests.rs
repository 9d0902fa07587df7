use actix_web::{http::StatusCode, rt::time::sleep, test};
use serde_json::json;
use std::time::Duration;

use crate::{
	models::{ApiResponse, LoginResp, Notification},
	summary::PeriodTotals,
	tests::{
		fixtures::TestFixtures,
		test_utils::{bearer, test_app, test_state, MemoryRepo},
	},
};

/// The alert worker runs off the request path, so poll for its output.
async fn wait_for_notifications(repo: &MemoryRepo, user_id: i32, expected: usize) -> Vec<Notification> {
	for _ in 0..50 {
		let found = repo.notifications_for(user_id);
		if found.len() >= expected {
			return found;
		}
		sleep(Duration::from_millis(10)).await;
	}
	repo.notifications_for(user_id)
}

#[actix_web::test]
async fn test_complete_user_flow() {
	let repo = MemoryRepo::new();
	let state = test_state(repo.clone());
	let app = test_app!(state);

	// Step 1: register
	let register_resp = test::TestRequest::post()
		.uri("/register")
		.set_json(&TestFixtures::valid_user_registration())
		.send_request(&app)
		.await;
	assert_eq!(register_resp.status(), StatusCode::CREATED, "Registration failed");
	let body: ApiResponse<LoginResp> = test::read_body_json(register_resp).await;
	let login = body.data.expect("Token not found in response");
	let user_id: i32 = login.uid.parse().unwrap();
	let token = login.token;

	// Step 2: configure a daily limit
	let limit_resp = test::TestRequest::put()
		.uri("/limits")
		.insert_header(bearer(&token))
		.set_json(&json!({ "daily_limit": 100, "daily_limit_enabled": true }))
		.send_request(&app)
		.await;
	assert_eq!(limit_resp.status(), StatusCode::OK);

	// Step 3: income never counts towards a limit
	let income_resp = test::TestRequest::post()
		.uri("/transactions")
		.insert_header(bearer(&token))
		.set_json(&TestFixtures::income("500"))
		.send_request(&app)
		.await;
	assert_eq!(income_resp.status(), StatusCode::CREATED);

	// Step 4: spend just under the limit
	let under_resp = test::TestRequest::post()
		.uri("/transactions")
		.insert_header(bearer(&token))
		.set_json(&TestFixtures::expense("60"))
		.send_request(&app)
		.await;
	assert_eq!(under_resp.status(), StatusCode::CREATED);
	sleep(Duration::from_millis(50)).await;
	assert!(repo.notifications_for(user_id).is_empty(), "alert raised below the limit");

	// Step 5: reach the limit exactly
	let reach_resp = test::TestRequest::post()
		.uri("/transactions")
		.insert_header(bearer(&token))
		.set_json(&TestFixtures::expense("40"))
		.send_request(&app)
		.await;
	assert_eq!(reach_resp.status(), StatusCode::CREATED);

	let alerts = wait_for_notifications(&repo, user_id, 1).await;
	assert_eq!(alerts.len(), 1, "expected one daily limit alert");
	assert!(alerts[0].message.contains("100.00"), "unexpected message: {}", alerts[0].message);

	// Step 6: the alert is visible through the API
	let listed = test::TestRequest::get()
		.uri("/notifications")
		.insert_header(bearer(&token))
		.send_request(&app)
		.await;
	let body: ApiResponse<Vec<Notification>> = test::read_body_json(listed).await;
	assert_eq!(body.data.unwrap().len(), 1);

	// Step 7: totals for the current month
	let summary_resp = test::TestRequest::get()
		.uri("/summary")
		.insert_header(bearer(&token))
		.send_request(&app)
		.await;
	assert_eq!(summary_resp.status(), StatusCode::OK);
	let body: ApiResponse<PeriodTotals> = test::read_body_json(summary_resp).await;
	assert_eq!(body.data.unwrap(), PeriodTotals::from_buckets(500.0, 100.0, 0.0));
}

#[actix_web::test]
async fn test_income_alone_never_alerts() {
	let repo = MemoryRepo::new();
	let state = test_state(repo.clone());
	let app = test_app!(state);

	let register_resp = test::TestRequest::post()
		.uri("/register")
		.set_json(&TestFixtures::valid_user_registration())
		.send_request(&app)
		.await;
	let body: ApiResponse<LoginResp> = test::read_body_json(register_resp).await;
	let login = body.data.unwrap();
	let user_id: i32 = login.uid.parse().unwrap();

	test::TestRequest::put()
		.uri("/limits")
		.insert_header(bearer(&login.token))
		.set_json(&json!({ "daily_limit": 10, "daily_limit_enabled": true }))
		.send_request(&app)
		.await;
	test::TestRequest::post()
		.uri("/transactions")
		.insert_header(bearer(&login.token))
		.set_json(&TestFixtures::income("1000"))
		.send_request(&app)
		.await;

	sleep(Duration::from_millis(50)).await;
	assert!(repo.notifications_for(user_id).is_empty());
}
