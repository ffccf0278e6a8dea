use super::{auth, cron, diet, profile, video};
use crate::middleware::auth as auth_middleware;
use crate::state::auth_state::AuthState;
use crate::state::cron_state::CronState;
use crate::state::diet_state::DietState;
use crate::state::profile_state::ProfileState;
use crate::state::token_state::TokenState;
use crate::state::video_state::VideoState;
use crate::state::AppServices;
use axum::routing::{get, IntoMakeService};
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub fn app_router(services: &AppServices) -> Router {
    let merged_router = {
        let token_state = TokenState::new(services);

        // 需要登录的接口
        let protected_router = Router::new()
            .merge(profile::routes().with_state(ProfileState::new(services)))
            .merge(video::routes().with_state(VideoState::new(services)))
            .merge(diet::routes().with_state(DietState::new(services)))
            .layer(ServiceBuilder::new().layer(middleware::from_fn_with_state(
                token_state,
                auth_middleware::auth,
            )));

        Router::new()
            .merge(auth::routes().with_state(AuthState::new(services)))
            .merge(cron::routes().with_state(CronState::new(services)))
            .merge(protected_router)
    };

    Router::new()
        .route("/health", get(|| async move { "Healthy..." }))
        .nest("/api", merged_router)
        .layer(TraceLayer::new_for_http())
}

pub fn routes(services: &AppServices) -> IntoMakeService<Router> {
    app_router(services).into_make_service()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app_config::AppConfig;
    use crate::error::error_code;
    use crate::repository::Repositories;
    use crate::service::sms_service::LogSmsSender;
    use crate::test_support::{
        sample_food, sample_video, MemoryCache, MemoryDietRepository,
        MemoryPlayRecordRepository, MemoryTokenRepository, MemoryUserRepository,
        MemoryVerificationCodeRepository, MemoryVideoRepository,
    };
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::Duration;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const CRON_SECRET: &str = "router-cron-secret";

    fn test_config(trust_upstream_headers: bool) -> AppConfig {
        AppConfig {
            port: 0,
            master_db_url: String::new(),
            slave_db_url: String::new(),
            redis_url: None,
            jwt_secret: "router-test-secret".to_string(),
            token_validity: Duration::days(7),
            verification_code_ttl: Duration::minutes(10),
            exercise_reset_cron: String::new(),
            cron_secret: Some(CRON_SECRET.to_string()),
            trust_upstream_headers,
            development: true,
            log_dir: "log".to_string(),
        }
    }

    fn test_router(trust_upstream_headers: bool) -> (Router, Arc<MemoryUserRepository>) {
        let videos: Vec<_> = (1..=5)
            .map(|id| sample_video(id, if id == 5 { "yoga" } else { "workout" }))
            .collect();
        let users = Arc::new(MemoryUserRepository::default());
        users.insert_user(1, "13900139000");
        let repos = Repositories {
            user_repo: users.clone(),
            token_repo: Arc::new(MemoryTokenRepository::default()),
            code_repo: Arc::new(MemoryVerificationCodeRepository::default()),
            video_repo: Arc::new(MemoryVideoRepository::with_videos(videos.clone())),
            play_record_repo: Arc::new(MemoryPlayRecordRepository::with_videos(videos)),
            diet_repo: Arc::new(MemoryDietRepository::with_foods(vec![
                sample_food(1, "米饭", "cereal", 116.0),
                sample_food(2, "鸡胸肉", "meat", 133.0),
            ])),
        };
        let services = AppServices::new(
            repos,
            Arc::new(MemoryCache::default()),
            Arc::new(LogSmsSender),
            &test_config(trust_upstream_headers),
        );
        (app_router(&services), users)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upstream_request(method: &str, uri: &str, role: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-id", "1")
            .header("x-user-role", role);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn call(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (router, _) = test_router(false);
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let res = router.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_need_token() {
        let (router, _) = test_router(false);
        let req = Request::builder()
            .uri("/api/videos?type=workout")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], error_code::MISSING_TOKEN);
        assert_eq!(body["success"], false);

        // 未开启时不信任上游头
        let req = upstream_request("GET", "/api/videos?type=workout", "user", None);
        assert_eq!(call(&router, req).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_profile_and_logout() {
        let (router, _) = test_router(false);
        let req = Request::builder()
            .uri("/api/auth/register?phoneNumber=13800138000")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        let code = body["data"]["code"].as_str().unwrap().to_string();

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/auth/register",
                json!({"phoneNumber": "13800138000", "password": "secret123", "verificationCode": code}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], 0);
        let token = body["data"]["token"].as_str().unwrap().to_string();
        let user_id = body["data"]["user"]["id"].as_i64().unwrap();

        let profile_req = || {
            Request::builder()
                .uri("/api/user/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap()
        };
        let (status, body) = call(&router, profile_req()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["phone"], "13800138000");
        assert!(body["data"].get("password").is_none());

        let (status, _) = call(
            &router,
            json_request("POST", "/api/auth/logout", json!({ "userId": user_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&router, profile_req()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], error_code::TOKEN_REVOKED);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let (router, _) = test_router(false);
        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/auth/login",
                json!({"phoneNumber": "13700137000", "password": "whatever1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], error_code::INVALID_PASSWORD);
    }

    #[tokio::test]
    async fn upstream_identity_when_trusted() {
        let (router, _) = test_router(true);
        let req = upstream_request("GET", "/api/videos?type=workout&limit=2", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["pagination"]["total"], 4);
        assert_eq!(body["data"]["pagination"]["totalPages"], 2);
        assert_eq!(body["data"]["videos"].as_array().unwrap().len(), 2);

        let req = upstream_request("GET", "/api/videos/404", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], error_code::VIDEO_NOT_FOUND);
    }

    #[tokio::test]
    async fn like_routes_are_not_taken_as_video_id() {
        let (router, _) = test_router(true);
        let like = || {
            upstream_request("POST", "/api/videos/like", "user", Some(json!({"videoId": 2})))
        };
        let (status, body) = call(&router, like()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["likeCount"], 1);

        let (status, body) = call(&router, like()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], error_code::ALREADY_LIKED);

        let req = upstream_request("GET", "/api/videos/2", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isLiked"], true);

        let req = upstream_request(
            "DELETE",
            "/api/videos/like",
            "user",
            Some(json!({"videoId": 2})),
        );
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["likeCount"], 0);
    }

    #[tokio::test]
    async fn playback_report_updates_counters() {
        let (router, users) = test_router(true);
        for _ in 0..2 {
            let req = upstream_request(
                "POST",
                "/api/playrecords",
                "user",
                Some(json!({"videoId": 2, "watchedTime": 30})),
            );
            let (status, _) = call(&router, req).await;
            assert_eq!(status, StatusCode::OK);
        }
        let user = users.get(1).unwrap();
        assert_eq!(user.today_exercise_seconds, 60);
        assert_eq!(user.total_exercise_seconds, 60);

        let req = upstream_request("GET", "/api/playrecords", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["records"][0]["watchedTime"], 60);
    }

    #[tokio::test]
    async fn add_food_requires_admin() {
        let (router, _) = test_router(true);
        let food = json!({"name": "燕麦", "category": "cereal", "unit": "100g", "calories": 389.0});

        let req = upstream_request("POST", "/api/foods", "user", Some(food.clone()));
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], error_code::PERMISSION_DENIED);

        let req = upstream_request("POST", "/api/foods", "admin", Some(food));
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["name"], "燕麦");

        // 列表不需要管理员
        let req = upstream_request("GET", "/api/foods?category=cereal", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn video_upload_requires_admin() {
        let (router, _) = test_router(true);
        let video = json!({
            "title": "晨间瑜伽",
            "type": "yoga",
            "coverImage": "https://cdn.example.com/morning.jpg",
            "videoUrl": "https://cdn.example.com/morning.mp4",
            "duration": 1200
        });

        let req = upstream_request("POST", "/api/videos/upload", "user", Some(video.clone()));
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], error_code::PERMISSION_DENIED);

        let mut bad_type = video.clone();
        bad_type["type"] = json!("dance");
        let req = upstream_request("POST", "/api/videos/upload", "admin", Some(bad_type));
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], error_code::UNSUPPORTED_VIDEO_TYPE);

        let req = upstream_request("POST", "/api/videos/upload", "admin", Some(video));
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 6);
        assert_eq!(body["data"]["type"], "yoga");
        assert_eq!(body["data"]["likeCount"], 0);

        let req = upstream_request("GET", "/api/videos/6", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "晨间瑜伽");
    }

    #[tokio::test]
    async fn workout_plan_may_be_empty() {
        let (router, users) = test_router(true);
        let req = upstream_request("GET", "/api/workout/plan", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "workout plan not generated yet");
        assert!(body.get("data").is_some());
        assert_eq!(body["data"], Value::Null);

        users.set_workout_plan(1, "周一: 深蹲 4x12");
        let req = upstream_request("GET", "/api/workout/plan", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["plan"], "周一: 深蹲 4x12");
        assert_eq!(body["data"]["userId"], 1);
    }

    #[tokio::test]
    async fn diet_upsert_and_bad_date() {
        let (router, _) = test_router(true);
        let req = upstream_request(
            "POST",
            "/api/diet",
            "user",
            Some(json!({
                "mealType": "lunch",
                "date": "2024-05-01",
                "items": [{"foodId": 1, "quantity": 2}, {"foodId": 99, "quantity": 1}]
            })),
        );
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalCalories"], 232);
        assert_eq!(body["data"]["skipped"][0]["reason"], "food not found");

        let req = upstream_request("GET", "/api/diet?date=2024-05-01", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["summary"]["mealTypeCalories"]["lunch"], 232);

        let req = upstream_request("GET", "/api/diet?date=yesterday", "user", None);
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], error_code::INVALID_DATE);
    }

    #[tokio::test]
    async fn cron_reset_checks_secret() {
        let (router, users) = test_router(false);
        let req = Request::builder()
            .uri("/api/cron/reset-exercise")
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(&router, req).await.0, StatusCode::FORBIDDEN);

        let req = Request::builder()
            .uri("/api/cron/reset-exercise")
            .header("x-cron-secret", CRON_SECRET)
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["affected"], 0);
        assert_eq!(users.get(1).unwrap().today_exercise_seconds, 0);
    }
}
