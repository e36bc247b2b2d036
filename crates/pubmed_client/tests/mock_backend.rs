use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use pubmed_client::mock_data::{seed_articles, seed_job, SEED_JOB_ID};
use pubmed_client::{
    ArticlesService, ClientError, ErrorKind, ExportFormat, JobsService, MockBackend, MockStore,
};
use pubmed_core::{Article, ArticleStatus, CreateJobRequest, JobStatus};

fn backend() -> MockBackend {
    MockBackend::without_delay()
}

#[tokio::test]
async fn seeded_job_is_served_for_any_id() {
    let mock = backend();
    let job = mock.get_job("anything").await.unwrap();
    assert_eq!(job, seed_job());
    assert_eq!(job.id, SEED_JOB_ID);
}

#[tokio::test]
async fn job_moves_through_the_pipeline_phases() {
    let mock = backend();
    let created = mock
        .create_job(&CreateJobRequest::new("AF", "malnutrition AND afib"))
        .await
        .unwrap();
    assert_eq!(created.status, JobStatus::Queued);
    assert_eq!(created.query, "malnutrition AND afib");
    assert!(created.id.starts_with("job_"));
    assert_ne!(created.id, SEED_JOB_ID);

    let id = created.id.clone();
    assert_eq!(mock.search_job(&id).await.unwrap().status, JobStatus::Searching);
    assert_eq!(mock.resolve_job(&id).await.unwrap().status, JobStatus::Resolving);
    assert_eq!(mock.download_job(&id).await.unwrap().status, JobStatus::Downloading);
    assert_eq!(mock.get_job(&id).await.unwrap().status, JobStatus::Downloading);
}

#[tokio::test]
async fn created_job_keeps_seed_defaults_for_missing_fields() {
    let mock = backend();
    let request = CreateJobRequest {
        max_results: Some(250),
        pmc_only: Some(true),
        ..CreateJobRequest::new("AF", "afib")
    };
    let job = mock.create_job(&request).await.unwrap();
    let seed = seed_job();
    assert_eq!(job.max_results, 250);
    assert!(job.pmc_only);
    assert_eq!(job.concurrency, seed.concurrency);
    assert_eq!(job.allow_external, seed.allow_external);
    assert_eq!(job.date_from, seed.date_from);
    assert_eq!(job.error_msg, None);
}

#[tokio::test]
async fn returned_jobs_are_copies() {
    let mock = backend();
    let mut job = mock.get_job(SEED_JOB_ID).await.unwrap();
    job.status = JobStatus::Failed;
    job.name.push_str(" (edited)");

    assert_eq!(mock.get_job(SEED_JOB_ID).await.unwrap(), seed_job());
}

#[tokio::test]
async fn article_lists_are_stable_per_job_and_copied() {
    let mock = backend();
    let mut first = mock.get_job_articles("jobA").await.unwrap();
    let second = mock.get_job_articles("jobA").await.unwrap();

    assert_eq!(first.len(), seed_articles().len());
    let ids = |articles: &[Article]| articles.iter().map(|a| a.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first[0].id, "jobA_art_1");
    assert!(first.iter().all(|article| article.job_id == "jobA"));

    first[0].status = ArticleStatus::FailedSearch;
    let third = mock.get_job_articles("jobA").await.unwrap();
    assert_eq!(third, second);
}

#[tokio::test]
async fn separate_jobs_get_separate_lists() {
    let mock = backend();
    mock.get_job_articles("jobA").await.unwrap();
    let other = mock.get_job_articles("jobB").await.unwrap();
    assert_eq!(other[0].id, "jobB_art_1");
    assert_eq!(mock.snapshot().article_lists().len(), 2);
}

#[tokio::test]
async fn retry_resets_a_failed_article() {
    let mock = backend();
    let articles = mock.get_job_articles("jobA").await.unwrap();
    let failed = articles
        .iter()
        .find(|article| article.status == ArticleStatus::FailedPaywall)
        .cloned()
        .unwrap();
    assert!(failed.failure_reason.is_some());

    let retried = mock.retry_article(&failed.id).await.unwrap();
    assert_eq!(retried.status, ArticleStatus::Downloading);
    assert_eq!(retried.retries, failed.retries + 1);
    assert_eq!(retried.failure_reason, None);

    let stored = mock.get_job_articles("jobA").await.unwrap();
    assert!(stored.contains(&retried));
}

#[tokio::test]
async fn unknown_article_is_reported_without_side_effects() {
    let mock = backend();
    mock.get_job_articles("jobA").await.unwrap();
    let before = mock.snapshot();

    let err = mock.retry_article("nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Article with id \"nope\" not found in mock dataset.");
    assert_eq!(
        err,
        ClientError::NotFound {
            entity: "Article",
            id: "nope".to_string()
        }
    );

    assert!(mock.crawl_article("nope").await.is_err());
    assert_eq!(mock.snapshot(), before);
}

fn unresolved_article(chosen_pdf_url: Option<&str>) -> Article {
    Article {
        id: "a1".to_string(),
        job_id: "job_x".to_string(),
        pmid: "123".to_string(),
        title: "Title".to_string(),
        pubmed_url: "https://pubmed.ncbi.nlm.nih.gov/123/".to_string(),
        pmc_id: None,
        external_url: None,
        chosen_pdf_url: chosen_pdf_url.map(str::to_string),
        status: ArticleStatus::FailedSearch,
        failure_reason: Some("No PDF link found".to_string()),
        retries: 0,
    }
}

fn backend_with(article: Article) -> MockBackend {
    let store = MockStore::with_job(seed_job()).with_articles("job_x", vec![article]);
    MockBackend::new(store, Duration::ZERO)
}

#[tokio::test]
async fn crawl_derives_a_pdf_url_from_the_pubmed_page() {
    let mock = backend_with(unresolved_article(None));

    let crawled = mock.crawl_article("a1").await.unwrap();
    assert_eq!(crawled.status, ArticleStatus::Resolved);
    assert_eq!(
        crawled.chosen_pdf_url.as_deref(),
        Some("https://pubmed.ncbi.nlm.nih.gov/123.pdf")
    );
    assert_eq!(crawled.failure_reason, None);
    assert_eq!(crawled.retries, 0);
}

#[tokio::test]
async fn crawl_treats_a_blank_pdf_url_as_missing() {
    let mock = backend_with(unresolved_article(Some("")));

    let crawled = mock.crawl_article("a1").await.unwrap();
    assert_eq!(
        crawled.chosen_pdf_url.as_deref(),
        Some("https://pubmed.ncbi.nlm.nih.gov/123.pdf")
    );
}

#[tokio::test]
async fn crawl_keeps_an_existing_pdf_url() {
    let mock = backend();
    let articles = mock.get_job_articles("jobA").await.unwrap();
    let downloaded = &articles[0];
    assert!(downloaded.chosen_pdf_url.is_some());

    let crawled = mock.crawl_article(&downloaded.id).await.unwrap();
    assert_eq!(crawled.chosen_pdf_url, downloaded.chosen_pdf_url);
    assert_eq!(crawled.status, ArticleStatus::Resolved);
}

#[tokio::test]
async fn exports_return_seed_json_and_empty_zip() {
    let mock = backend();
    for format in [ExportFormat::Csv, ExportFormat::Json] {
        let blob = mock.export_job(SEED_JOB_ID, format).await.unwrap();
        assert_eq!(blob.content_type.as_deref(), Some("application/json"));
        let parsed: Vec<Article> = serde_json::from_slice(&blob.bytes).unwrap();
        assert_eq!(parsed, seed_articles());
    }

    let zip = mock.export_job_zip(SEED_JOB_ID).await.unwrap();
    assert!(zip.is_empty());
    assert_eq!(zip.content_type.as_deref(), Some("application/zip"));
}

#[tokio::test]
async fn mock_validates_like_the_real_client() {
    let mock = backend();
    let before = mock.snapshot();

    let err = mock.create_job(&CreateJobRequest::new("AF", "")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(mock.search_job(" ").await.unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(mock.retry_article("").await.unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(mock.snapshot(), before);
}

#[tokio::test]
async fn backends_do_not_share_state() {
    let first = backend();
    let second = backend();
    first.search_job(SEED_JOB_ID).await.unwrap();
    assert_eq!(first.get_job(SEED_JOB_ID).await.unwrap().status, JobStatus::Searching);
    assert_eq!(second.get_job(SEED_JOB_ID).await.unwrap().status, JobStatus::Downloading);
}

#[tokio::test]
async fn configured_delay_is_applied() {
    let delay = Duration::from_millis(30);
    let mock = MockBackend::new(MockStore::default(), delay);
    let started = Instant::now();
    mock.get_job(SEED_JOB_ID).await.unwrap();
    assert!(started.elapsed() >= delay);
}
