use std::sync::Arc;
use std::time::{ Duration, Instant };
use wiremock::matchers::method;
use wiremock::{ Mock, MockServer, ResponseTemplate };

use crate::config::{ ConfigError, ThemeConfig };
use crate::implementations::http_fetcher::{ HttpFetcher, DEFAULT_USER_AGENT };
use crate::implementations::theme_verifier::{ ThemeMatcher, ThemeVerifier };
use crate::models::submission::Submission;
use crate::models::verification::{ FetchOutcome, VerificationResult };
use crate::tests::{ init_logging, theme_page, ScriptedFetcher };

fn matcher() -> ThemeMatcher {
    ThemeMatcher::new(&ThemeConfig::default()).unwrap()
}

fn verifier(fetcher: Arc<ScriptedFetcher>, cooldown: Duration) -> ThemeVerifier {
    ThemeVerifier::new(fetcher, matcher(), cooldown)
}

fn body(text: &str) -> FetchOutcome {
    FetchOutcome::Body(text.to_string())
}

#[test]
fn brand_and_both_markers_classify_as_success() {
    let page = r#"<div class="l_body"><header class="l_header">Stellar</header></div>"#;
    assert!(matcher().classify(page).is_success());
}

#[test]
fn brand_match_is_case_insensitive() {
    let matcher = matcher();
    assert!(matcher.has_brand("powered by stellar"));
    assert!(matcher.has_brand("POWERED BY STELLAR"));
    assert!(!matcher.has_brand("powered by hexo"));
}

#[test]
fn removing_any_check_flips_to_not_theme() {
    let matcher = matcher();
    for page in [
        r#"<div class="l_body"><header class="l_header">Volantis</header></div>"#,
        r#"<div class="l_body"><header>Stellar</header></div>"#,
        r#"<div><header class="l_header">Stellar</header></div>"#,
    ] {
        match matcher.classify(page) {
            VerificationResult::NotTheme { raw_html } => assert_eq!(raw_html, page),
            other => panic!("expected NotTheme for {:?}, got {:?}", page, other),
        }
    }
}

#[test]
fn version_is_extracted_when_declared() {
    let result = matcher().classify(&theme_page(Some("1.28.1")));
    assert_eq!(result, VerificationResult::Success {
        version: Some("1.28.1".to_string()),
    });
}

#[test]
fn missing_or_empty_version_is_not_an_error() {
    let matcher = matcher();
    assert_eq!(matcher.classify(&theme_page(None)), VerificationResult::Success { version: None });

    let empty = theme_page(None).replace("<title>", r#"<meta theme-version=""><title>"#);
    assert_eq!(matcher.classify(&empty), VerificationResult::Success { version: None });
}

#[test]
fn version_attribute_is_matched_across_lines() {
    let page = "<meta name=\"hexo-theme\"\n      theme-version=\"2.0.0-beta.1\">Stellar l_header l_body";
    assert_eq!(matcher().extract_version(page), Some("2.0.0-beta.1".to_string()));
}

#[test]
fn version_falls_back_to_meta_source_link() {
    let page = r#"<meta name="hexo-theme" content="https://github.com/xaoxuu/hexo-theme-stellar/tree/1.29.0" theme-name="Stellar"><div class="l_header l_body">"#;
    assert_eq!(matcher().classify(page), VerificationResult::Success {
        version: Some("1.29.0".to_string()),
    });

    let prerelease = r#"<meta content="https://github.com/xaoxuu/hexo-theme-stellar/tree/2.0.0-rc.1" name="hexo-theme">"#;
    assert_eq!(matcher().extract_version(prerelease), Some("2.0.0-rc.1".to_string()));
}

#[test]
fn declared_version_wins_over_meta_source_link() {
    let page = r#"<meta name="hexo-theme" content="https://github.com/xaoxuu/hexo-theme-stellar/tree/1.0.0" theme-version="1.29.0">"#;
    assert_eq!(matcher().extract_version(page), Some("1.29.0".to_string()));
}

#[test]
fn source_links_outside_the_theme_meta_are_ignored() {
    let page = r#"<meta name="generator" content="Hexo"><a href="https://github.com/me/blog/tree/3.1.4">src</a>"#;
    assert_eq!(matcher().extract_version(page), None);
}

#[test]
fn matcher_requires_a_layout_marker() {
    for markers in [vec![], vec!["  ".to_string(), String::new()]] {
        let theme = ThemeConfig {
            markers,
            ..ThemeConfig::default()
        };
        assert!(
            matches!(
                ThemeMatcher::new(&theme),
                Err(ConfigError::InvalidField { field: "theme.markers", .. })
            )
        );
    }
}

#[test]
fn custom_theme_config_is_honoured() {
    let theme = ThemeConfig {
        name: "Volantis".to_string(),
        markers: vec!["l_main".to_string()],
        version_attribute: "data-version".to_string(),
    };
    let matcher = ThemeMatcher::new(&theme).unwrap();
    let page = r#"<body data-version="5.8.0"><main class="l_main">volantis</main></body>"#;
    assert_eq!(matcher.classify(page), VerificationResult::Success {
        version: Some("5.8.0".to_string()),
    });
}

#[tokio::test]
async fn success_is_not_retried() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![body(&theme_page(Some("1.0.0")))]));
    let result = verifier(fetcher.clone(), Duration::ZERO).verify(&Submission::new("1", "https://a.example")).await;

    assert_eq!(result, VerificationResult::Success { version: Some("1.0.0".to_string()) });
    assert_eq!(fetcher.calls(), vec![("https://a.example".to_string(), false)]);
}

#[tokio::test]
async fn not_theme_is_retried_once_with_random_identity() {
    init_logging();
    let fetcher = Arc::new(
        ScriptedFetcher::new(vec![body("Just a moment... checking your browser"), body(&theme_page(None))])
    );
    let result = verifier(fetcher.clone(), Duration::ZERO).verify(&Submission::new("1", "https://a.example")).await;

    assert_eq!(result, VerificationResult::Success { version: None });
    assert_eq!(
        fetcher.calls(),
        vec![("https://a.example".to_string(), false), ("https://a.example".to_string(), true)]
    );
}

#[tokio::test]
async fn second_not_theme_is_final() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(vec![body("first"), body("second"), body(&theme_page(None))])
    );
    let result = verifier(fetcher.clone(), Duration::ZERO).verify(&Submission::new("1", "https://a.example")).await;

    assert_eq!(result, VerificationResult::NotTheme { raw_html: "second".to_string() });
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test]
async fn retry_waits_for_cooldown() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![body("first"), body("second")]));
    let started = Instant::now();
    verifier(fetcher, Duration::from_millis(150)).verify(&Submission::new("1", "https://a.example")).await;
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn fetch_failures_are_never_retried() {
    let cases = vec![
        (FetchOutcome::NotFound, VerificationResult::NotFound),
        (FetchOutcome::NotOk(503), VerificationResult::NetworkError),
        (FetchOutcome::TransportError("reset".to_string()), VerificationResult::NetworkError)
    ];

    for (outcome, expected) in cases {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![outcome, body(&theme_page(None))]));
        let result = verifier(fetcher.clone(), Duration::ZERO).verify(
            &Submission::new("1", "https://a.example")
        ).await;

        assert_eq!(result, expected);
        assert_eq!(fetcher.calls().len(), 1);
    }
}

#[tokio::test]
async fn empty_url_skips_fetch() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![body(&theme_page(None))]));
    let result = verifier(fetcher.clone(), Duration::ZERO).verify(&Submission::new("9", "")).await;

    assert_eq!(result, VerificationResult::NetworkError);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn retry_goes_out_with_a_different_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Access denied</html>"))
        .expect(2)
        .mount(&server).await;

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5)).unwrap());
    let verifier = ThemeVerifier::new(fetcher, matcher(), Duration::ZERO);
    let result = verifier.verify(&Submission::new("3", server.uri())).await;
    assert!(matches!(result, VerificationResult::NotTheme { .. }));

    let requests = server.received_requests().await.unwrap();
    let agents: Vec<&str> = requests
        .iter()
        .map(|req| req.headers.get("user-agent").unwrap().to_str().unwrap())
        .collect();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0], DEFAULT_USER_AGENT);
    assert_ne!(agents[1], agents[0]);
}
