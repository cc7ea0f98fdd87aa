#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::{
        core::{
            accounts::{AccountCredential, LoginMethod},
            authenticator::MarketSession,
            common::MarketHttpClient,
            configuration::{ApiConfiguration, Configuration},
        },
        report::AccountResult,
        workflow::{raffle::RaffleAgent, AccountWorkflow},
    };

    const RAFFLE: &str = "/prod-api/promotion/home/raffleActivity";

    fn conf_for(mock_server: &MockServer, auto_grant: bool) -> Configuration {
        let mut conf = Configuration::default();
        conf.api = ApiConfiguration {
            client_url: mock_server.uri(),
            market_url: mock_server.uri(),
            backoff_ms: 1,
            ..ApiConfiguration::default()
        };
        conf.core.auto_grant = auto_grant;
        conf.core.raffle_delay = 0;
        conf.core.account_delay = 0;
        conf
    }

    fn account(token: &str) -> AccountCredential {
        AccountCredential {
            phone: "138xxxx".to_string(),
            login: LoginMethod::SessionToken(token.to_string()),
        }
    }

    async fn run(mock_server: &MockServer, auto_grant: bool, token: &str) -> AccountResult {
        let conf = conf_for(mock_server, auto_grant);
        let client = MarketHttpClient::new(&conf.api).unwrap();

        AccountWorkflow::new(client, conf).run(&account(token)).await
    }

    async fn mount_authentication(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/mobileService/openPlatform/openPlatLine.htm"))
            .respond_with(ResponseTemplate::new(302).insert_header(
                "Location",
                "https://contact.bol.wo.cn/market?ticket=tk-1",
            ))
            .mount(mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/prod-api/auth/marketUnicomLogin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "data": { "token": "user-42" }
            })))
            .mount(mock_server)
            .await;
    }

    async fn mount_tasks(mock_server: &MockServer, tasks: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/prod-api/promotion/activityTask/getAllActivityTasks"))
            .and(query_param("activityId", "12"))
            .and(header("authorization", "Bearer user-42"))
            .and(header("cookie", "ecs_token=tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "data": { "activityTaskUserDetailVOList": tasks }
            })))
            .mount(mock_server)
            .await;
    }

    async fn mount_catalog(mock_server: &MockServer, names: &[&str]) {
        let prizes: Vec<_> = names.iter().map(|n| json!({ "name": n })).collect();

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/prizeList")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "code": 200, "data": prizes })),
            )
            .mount(mock_server)
            .await;
    }

    async fn mount_draw_count(mock_server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/getUserRaffleCount")))
            .respond_with(response)
            .mount(mock_server)
            .await;
    }

    async fn mount_draws(mock_server: &MockServer, count: u64, expected_draws: u64) {
        mount_draw_count(
            mock_server,
            ResponseTemplate::new(200).set_body_json(json!({ "code": 200, "data": count })),
        )
        .await;

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/userRaffle")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "data": { "prizesName": "视频月卡" }
            })))
            .expect(expected_draws)
            .mount(mock_server)
            .await;
    }

    async fn mount_pending(mock_server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/getMyPrize")))
            .and(body_partial_json(json!({ "id": 12, "type": 0, "page": 1, "limit": 100 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": { "list": [
                    { "id": 1, "prizesName": "视频月卡" },
                    { "id": 2, "prizesName": "5元话费券" }
                ] }
            })))
            .expect(expected_calls)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn full_run_classifies_tasks_and_draws() {
        let mock_server = MockServer::start().await;
        mount_authentication(&mock_server).await;
        mount_tasks(
            &mock_server,
            json!([
                { "name": "浏览会场", "triggerTime": 1, "triggeredTime": 0,
                  "param1": "view-key" },
                { "name": "分享活动", "triggerTime": 1, "triggeredTime": 0,
                  "param1": "share-key" },
                { "name": "浏览秒杀专区", "triggerTime": 1, "triggeredTime": 0,
                  "param1": "x" },
                { "name": "查看权益", "triggerTime": 1, "triggeredTime": 1, "param1": "y" },
                { "name": "每日签到", "triggerTime": 1, "triggeredTime": 0, "param1": "z" }
            ]),
        )
        .await;

        Mock::given(method("POST"))
            .and(path("/prod-api/promotion/activityTaskShare/checkView"))
            .and(query_param("checkKey", "view-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/prod-api/promotion/activityTaskShare/checkShare"))
            .and(query_param("checkKey", "share-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 500 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        // skipped, finished and unknown tasks never reach the network
        for endpoint in ["checkView", "checkShare"] {
            for key in ["x", "y", "z"] {
                Mock::given(method("POST"))
                    .and(path(format!("/prod-api/promotion/activityTaskShare/{endpoint}")))
                    .and(query_param("checkKey", key))
                    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
                    .expect(0)
                    .mount(&mock_server)
                    .await;
            }
        }

        mount_catalog(&mock_server, &["视频月卡", "谢谢参与"]).await;
        mount_draws(&mock_server, 3, 3).await;
        mount_pending(&mock_server, 0).await;

        let res = run(&mock_server, false, "tok123").await;

        assert!(res.success);
        assert_eq!("执行完成", res.message);
        assert_eq!(vec!["浏览会场"], res.task_details.success);
        assert_eq!(vec!["分享活动（响应码：500）"], res.task_details.fail);
        assert_eq!(vec!["浏览秒杀专区（复杂任务跳过）"], res.task_details.skip);
        assert_eq!(vec!["查看权益"], res.task_details.done);
        assert_eq!(vec!["每日签到（无法识别任务类型）"], res.task_details.unknown);

        assert_eq!(3, res.raffle_count);
        assert_eq!(3, res.raffle_details.len());
        assert_eq!("🎁 视频月卡", res.raffle_details[0]);

        assert_eq!(vec!["自动领奖功能已关闭"], res.grant_details);
    }

    #[tokio::test]
    async fn no_draw_when_the_pool_is_not_flushing() {
        let mock_server = MockServer::start().await;
        mount_authentication(&mock_server).await;
        mount_tasks(&mock_server, json!([])).await;
        mount_catalog(&mock_server, &["谢谢参与", "1元话费券"]).await;
        mount_draws(&mock_server, 3, 0).await;
        mount_pending(&mock_server, 0).await;

        let res = run(&mock_server, false, "tok123").await;

        assert!(res.success);
        assert_eq!(0, res.raffle_count);
        assert_eq!(vec!["今日未放水，跳过抽奖"], res.raffle_details);
    }

    #[tokio::test]
    async fn zero_draws_left() {
        let mock_server = MockServer::start().await;
        mount_authentication(&mock_server).await;
        mount_tasks(&mock_server, json!([])).await;
        mount_catalog(&mock_server, &["视频月卡"]).await;
        mount_draws(&mock_server, 0, 0).await;
        mount_pending(&mock_server, 0).await;

        let res = run(&mock_server, false, "tok123").await;

        assert!(res.success);
        assert_eq!(0, res.raffle_count);
        assert!(res.raffle_details.is_empty());
    }

    #[tokio::test]
    async fn draw_failures_are_recorded_in_order() {
        let mock_server = MockServer::start().await;
        mount_authentication(&mock_server).await;
        mount_tasks(&mock_server, json!([])).await;
        mount_catalog(&mock_server, &["视频月卡"]).await;
        mount_pending(&mock_server, 0).await;
        mount_draw_count(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(json!({ "code": 200, "data": "3" })),
        )
        .await;

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/userRaffle")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 500, "msg": "活动太火爆", "data": ""
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/userRaffle")))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>busy</html>"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/userRaffle")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "data": { "prizesName": "视频月卡" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let res = run(&mock_server, false, "tok123").await;

        assert!(res.success);
        assert_eq!(3, res.raffle_count);
        assert_eq!(
            vec![
                "❌ 抽奖失败（响应码：500）".to_string(),
                "❌ 抽奖请求失败".to_string(),
                "🎁 视频月卡".to_string(),
            ],
            res.raffle_details
        );
    }

    #[tokio::test]
    async fn rejected_draw_reports_its_code_whatever_the_data() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/userRaffle")))
            .and(header("authorization", "Bearer user-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 500, "msg": "活动太火爆", "data": ""
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let conf = conf_for(&mock_server, false);
        let client = MarketHttpClient::new(&conf.api).unwrap();
        let session = MarketSession {
            ecs_token: "tok123".to_string(),
            user_token: "user-42".to_string(),
        };

        let detail = RaffleAgent::new(&client, &conf.api, &session)
            .draw_once()
            .await
            .unwrap();

        assert_eq!("❌ 抽奖失败（响应码：500）", detail);
    }

    #[tokio::test]
    async fn unreadable_draw_count_means_no_draw() {
        let mock_server = MockServer::start().await;
        mount_authentication(&mock_server).await;
        mount_tasks(&mock_server, json!([])).await;
        mount_catalog(&mock_server, &["视频月卡"]).await;
        mount_pending(&mock_server, 0).await;
        mount_draw_count(
            &mock_server,
            ResponseTemplate::new(500).set_body_string("Internal Server Error"),
        )
        .await;

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/userRaffle")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
            .expect(0)
            .mount(&mock_server)
            .await;

        let res = run(&mock_server, false, "tok123").await;

        assert!(res.success);
        assert_eq!(0, res.raffle_count);
        assert!(res.raffle_details.is_empty());
    }

    #[tokio::test]
    async fn pending_prizes_are_claimed_when_enabled() {
        let mock_server = MockServer::start().await;
        mount_authentication(&mock_server).await;
        mount_tasks(&mock_server, json!([])).await;
        mount_catalog(&mock_server, &[]).await;
        mount_pending(&mock_server, 1).await;

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/grantPrize")))
            .and(query_param("activityId", "12"))
            .and(body_partial_json(json!({ "recordId": 1 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("{RAFFLE}/grantPrize")))
            .and(body_partial_json(json!({ "recordId": 2 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 601 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let res = run(&mock_server, true, "tok123").await;

        assert!(res.success);
        assert_eq!(
            vec![
                "✅ 领奖成功：视频月卡".to_string(),
                "❌ 领奖失败：5元话费券（响应码：601）".to_string(),
            ],
            res.grant_details
        );
    }

    #[tokio::test]
    async fn missing_location_aborts_the_account() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/mobileService/openPlatform/openPlatLine.htm"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/prod-api/promotion/activityTask/getAllActivityTasks"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let res = run(&mock_server, true, "tok123").await;

        assert!(!res.success);
        assert_eq!("获取ticket失败", res.message);
        assert!(res.task_details.success.is_empty());
        assert!(res.task_details.fail.is_empty());
        assert!(res.raffle_details.is_empty());
        assert!(res.grant_details.is_empty());
    }

    #[tokio::test]
    async fn unexpected_errors_are_recorded_on_the_account() {
        let mock_server = MockServer::start().await;

        let res = run(&mock_server, false, "bad\ttoken\n").await;

        assert!(!res.success);
        assert!(res.message.starts_with("执行异常: "));
    }
}
