//! Integration tests for massmailer-mail

use massmailer_mail::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn templates() -> HandlebarsEngine {
    let mut engine = HandlebarsEngine::new();
    engine
        .register_part("campaigns.weekly", "html", "<h1>{{headline}}</h1>")
        .unwrap();
    engine
        .register_part("campaigns.weekly", "text", "{{headline}}")
        .unwrap();
    engine
        .register_part("campaigns.weekly", "subject", "Ignored when params set one")
        .unwrap();
    engine
}

fn config() -> MailConfig {
    MailConfig::new("hello@x.com", Some("Example".to_string()))
}

fn params(recipients: &[&str]) -> MailParams {
    MailParams::builder()
        .template("campaigns.weekly")
        .variable("headline", "Spring sale")
        .recipients(recipients.iter().copied())
        .subject("This week")
        .sender("news@x.com", "Example News")
        .build()
        .unwrap()
}

fn dispatcher(
    transport: Arc<MemoryTransport>,
    log: Arc<MemoryLog>,
) -> DefaultMailer<Mailer> {
    let facade = Mailer::from_parts(transport, Arc::new(templates()));
    DefaultMailer::new(facade, &config()).unwrap().with_log(log)
}

#[tokio::test]
async fn test_all_recipients_accepted() {
    let transport = Arc::new(MemoryTransport::new());
    let log = Arc::new(MemoryLog::new());
    let mailer = dispatcher(transport.clone(), log.clone());

    let delivered = mailer.send(&params(&["a@x.com"]), Box::new(|| {})).await.unwrap();

    assert!(delivered);
    assert!(log.is_empty());

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].html.as_deref(), Some("<h1>Spring sale</h1>"));
    assert_eq!(sent[0].text.as_deref(), Some("Spring sale"));
    assert_eq!(sent[0].subject.as_deref(), Some("This week"));
    assert_eq!(sent[0].reply_to.as_ref().unwrap().email(), "hello@x.com");
    assert_eq!(sent[0].from.as_ref().unwrap().email(), "news@x.com");
}

#[tokio::test]
async fn test_partial_failure_reports_false() {
    let transport = Arc::new(MemoryTransport::new().reject(["b@x.com"]));
    let log = Arc::new(MemoryLog::new());
    let mailer = dispatcher(transport.clone(), log.clone());

    let delivered = mailer
        .send(&params(&["a@x.com", "b@x.com"]), Box::new(|| {}))
        .await
        .unwrap();

    assert!(!delivered);
    // One message went out to the whole list.
    assert_eq!(transport.sent_count(), 1);

    let entries = log.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].contains("errors occurred"));
    assert!(entries[1].ends_with(r#"["b@x.com"]"#));
}

#[tokio::test]
async fn test_failure_list_preserves_order() {
    let transport = Arc::new(MemoryTransport::new().reject(["c@x.com", "a@x.com"]));
    let log = Arc::new(MemoryLog::new());
    let mailer = dispatcher(transport, log.clone());

    let delivered = mailer
        .send(&params(&["a@x.com", "b@x.com", "c@x.com"]), Box::new(|| {}))
        .await
        .unwrap();

    assert!(!delivered);

    let payload = log.entries()[1]
        .strip_prefix("Emails affected: ")
        .unwrap()
        .to_string();
    let failed: Vec<String> = serde_json::from_str(&payload).unwrap();
    assert_eq!(failed, vec!["a@x.com", "c@x.com"]);
}

#[tokio::test]
async fn test_callback_invoked_once_per_send() {
    let transport = Arc::new(MemoryTransport::new().reject(["b@x.com"]));
    let log = Arc::new(MemoryLog::new());
    let mailer = dispatcher(transport, log);
    let calls = Arc::new(AtomicUsize::new(0));

    for recipients in [&["a@x.com"][..], &["b@x.com"][..]] {
        let counter = calls.clone();
        mailer
            .send(
                &params(recipients),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_template_is_an_error() {
    let transport = Arc::new(MemoryTransport::new());
    let log = Arc::new(MemoryLog::new());
    let mailer = dispatcher(transport.clone(), log.clone());

    let params = MailParams::builder()
        .template("campaigns.unknown")
        .recipient("a@x.com")
        .subject("Hi")
        .sender("news@x.com", "Example News")
        .build()
        .unwrap();

    let result = mailer.send(&params, Box::new(|| {})).await;

    assert!(matches!(result, Err(MailError::TemplateNotFound(_))));
    assert_eq!(transport.sent_count(), 0);
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_variables_reach_template() {
    #[derive(serde::Serialize)]
    struct Digest {
        headline: String,
    }

    let transport = Arc::new(MemoryTransport::new());
    let log = Arc::new(MemoryLog::new());
    let mailer = dispatcher(transport.clone(), log);

    let params = MailParams::builder()
        .template("campaigns.weekly")
        .variables(&Digest {
            headline: "From a struct".to_string(),
        })
        .recipient("a@x.com")
        .subject("Hi")
        .sender("news@x.com", "Example News")
        .build()
        .unwrap();

    assert_eq!(params.variables().get("headline"), Some(&json!("From a struct")));
    assert!(mailer.send(&params, Box::new(|| {})).await.unwrap());
    assert_eq!(transport.sent()[0].text.as_deref(), Some("From a struct"));
}
