#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::{
        core::configuration::{Configuration, WebhookConfiguration, WebhookKind},
        notifiers::{
            webhook::{sign, WebhookNotifier},
            MockNotifier, NotificationDispatcher, Notifier, NotifierError,
        },
    };

    fn failing(name: &'static str) -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_name().return_const(name.to_string());
        notifier.expect_send().times(1).returning(|_, _| {
            Err(Box::new(NotifierError::new("unreachable".to_string())))
        });
        notifier
    }

    fn webhook(kind: WebhookKind, url: String, secret: Option<&str>) -> WebhookConfiguration {
        WebhookConfiguration {
            enable: true,
            kind,
            url,
            secret: secret.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn dispatch_stops_at_first_success() {
        let mut delivering = MockNotifier::new();
        delivering.expect_name().return_const("webhook".to_string());
        delivering
            .expect_send()
            .withf(|title, body| title.to_string() == "T" && body.to_string() == "B")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut never_reached = MockNotifier::new();
        never_reached.expect_name().return_const("console".to_string());
        never_reached.expect_send().times(0);

        let dispatcher = NotificationDispatcher::new(vec![
            Box::new(failing("hook")),
            Box::new(delivering),
            Box::new(never_reached),
        ]);

        assert_eq!(Some("webhook".to_string()), dispatcher.dispatch("T", "B").await);
    }

    #[tokio::test]
    async fn dispatch_reports_when_nothing_delivered() {
        let dispatcher = NotificationDispatcher::new(vec![Box::new(failing("hook"))]);

        assert_eq!(None, dispatcher.dispatch("T", "B").await);
    }

    #[tokio::test]
    async fn default_configuration_falls_back_to_console() {
        let dispatcher = NotificationDispatcher::from_configuration(&Configuration::default());

        assert_eq!(Some("console".to_string()), dispatcher.dispatch("T", "B").await);
    }

    #[tokio::test]
    async fn invalid_webhook_is_skipped() {
        let mut conf = Configuration::default();
        conf.notify.webhook = Some(webhook(WebhookKind::WeChat, "".to_string(), None));

        let dispatcher = NotificationDispatcher::from_configuration(&conf);

        assert_eq!(Some("console".to_string()), dispatcher.dispatch("T", "B").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_hook_falls_through() {
        let mut conf = Configuration::default();
        conf.notify.hook_command = Some("false".to_string());

        let dispatcher = NotificationDispatcher::from_configuration(&conf);

        assert_eq!(Some("console".to_string()), dispatcher.dispatch("T", "B").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn succeeding_hook_delivers() {
        let mut conf = Configuration::default();
        conf.notify.hook_command = Some("true".to_string());

        let dispatcher = NotificationDispatcher::from_configuration(&conf);

        assert_eq!(Some("hook (true)".to_string()), dispatcher.dispatch("T", "B").await);
    }

    #[test]
    fn sign_is_a_base64_sha256_mac() {
        let first = sign("SECabc", "1700000000000").unwrap();
        let again = sign("SECabc", "1700000000000").unwrap();
        let other = sign("SECabc", "1700000000001").unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(32, STANDARD.decode(first).unwrap().len());
    }

    #[test]
    fn dingtalk_request_is_signed_when_a_secret_is_set() {
        let notifier = WebhookNotifier::new(&webhook(
            WebhookKind::DingTalk,
            "https://oapi.dingtalk.com/robot/send?access_token=abc".to_string(),
            Some("SECabc"),
        ))
        .unwrap();

        let (url, payload) = notifier.build_request("T", "B", 1700000000000).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(("access_token".to_string(), "abc".to_string()), pairs[0]);
        assert_eq!(("timestamp".to_string(), "1700000000000".to_string()), pairs[1]);
        assert_eq!(
            ("sign".to_string(), sign("SECabc", "1700000000000").unwrap()),
            pairs[2]
        );
        assert_eq!(json!({"msgtype": "text", "text": {"content": "T\n\nB"}}), payload);
    }

    #[test]
    fn dingtalk_request_without_secret_keeps_the_url() {
        let notifier = WebhookNotifier::new(&webhook(
            WebhookKind::DingTalk,
            "https://oapi.dingtalk.com/robot/send?access_token=abc".to_string(),
            None,
        ))
        .unwrap();

        let (url, _) = notifier.build_request("T", "B", 1).unwrap();

        assert_eq!("https://oapi.dingtalk.com/robot/send?access_token=abc", url.as_str());
    }

    #[tokio::test]
    async fn serverchan_posts_title_and_desp() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/KEY.send"))
            .and(body_json(json!({ "title": "T", "desp": "B" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let notifier = WebhookNotifier::new(&webhook(
            WebhookKind::ServerChan,
            format!("{}/KEY.send", mock_server.uri()),
            None,
        ))
        .unwrap();

        notifier.send("T", "B").await.unwrap();
    }

    #[tokio::test]
    async fn wechat_error_status_is_a_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/webhook/send"))
            .and(query_param("key", "k"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let notifier = WebhookNotifier::new(&webhook(
            WebhookKind::WeChat,
            format!("{}/cgi-bin/webhook/send?key=k", mock_server.uri()),
            None,
        ))
        .unwrap();

        assert!(notifier.send("T", "B").await.is_err());
    }
}
