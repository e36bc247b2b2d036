//! Seed records for the mock backend.

use pubmed_core::{Article, ArticleStatus, Job, JobStatus};

pub const SEED_JOB_ID: &str = "job_123";

pub fn seed_job() -> Job {
    Job {
        id: SEED_JOB_ID.to_string(),
        created_at: "2024-05-01T09:30:00.000Z".to_string(),
        name: "Atrial Fibrillation Research".to_string(),
        query: r#"("atrial fibrillation"[tiab]) AND (malnutrition[tiab])"#.to_string(),
        max_results: 50,
        date_from: Some("2020-01-01".to_string()),
        date_to: Some("2024-04-30".to_string()),
        pmc_only: false,
        allow_external: true,
        concurrency: 3,
        status: JobStatus::Downloading,
        error_msg: None,
    }
}

struct Seed {
    pmid: &'static str,
    title: &'static str,
    pmc_id: Option<&'static str>,
    external_url: Option<&'static str>,
    chosen_pdf_url: Option<&'static str>,
    status: ArticleStatus,
    failure_reason: Option<&'static str>,
    retries: u32,
}

const SEEDS: [Seed; 8] = [
    Seed {
        pmid: "32345678",
        title: "Effects of malnutrition on atrial fibrillation outcomes",
        pmc_id: Some("PMC7654321"),
        external_url: None,
        chosen_pdf_url: Some("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7654321/pdf"),
        status: ArticleStatus::Downloaded,
        failure_reason: None,
        retries: 0,
    },
    Seed {
        pmid: "33445566",
        title: "Nutritional deficiencies and atrial remodeling",
        pmc_id: Some("PMC7788991"),
        external_url: None,
        chosen_pdf_url: Some("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7788991/pdf"),
        status: ArticleStatus::Downloaded,
        failure_reason: None,
        retries: 0,
    },
    Seed {
        pmid: "31223344",
        title: "Protein-energy malnutrition in arrhythmia clinics",
        pmc_id: None,
        external_url: Some("https://journal.example.com/article/31223344"),
        chosen_pdf_url: None,
        status: ArticleStatus::Resolved,
        failure_reason: None,
        retries: 1,
    },
    Seed {
        pmid: "37651234",
        title: "Electrolyte imbalance as a predictor of atrial fibrillation",
        pmc_id: None,
        external_url: Some("https://journal-paywalled.example.com/article/37651234"),
        chosen_pdf_url: None,
        status: ArticleStatus::FailedPaywall,
        failure_reason: Some("Publisher paywall detected"),
        retries: 2,
    },
    Seed {
        pmid: "39887711",
        title: "Dietary interventions for atrial fibrillation prevention",
        pmc_id: None,
        external_url: Some("https://open-access.example.com/articles/39887711"),
        chosen_pdf_url: None,
        status: ArticleStatus::Downloading,
        failure_reason: None,
        retries: 0,
    },
    Seed {
        pmid: "31224455",
        title: "Malnutrition screening in cardiology wards",
        pmc_id: None,
        external_url: None,
        chosen_pdf_url: None,
        status: ArticleStatus::PendingUrls,
        failure_reason: None,
        retries: 0,
    },
    Seed {
        pmid: "35551234",
        title: "Crawling challenges in medical journal archives",
        pmc_id: None,
        external_url: Some("https://robots-blocked.example.com/article/35551234"),
        chosen_pdf_url: None,
        status: ArticleStatus::SkippedRobots,
        failure_reason: Some("Robots.txt disallows crawling"),
        retries: 1,
    },
    Seed {
        pmid: "34455667",
        title: "Micronutrient therapy adherence in atrial fibrillation",
        pmc_id: None,
        external_url: None,
        chosen_pdf_url: None,
        status: ArticleStatus::Resolved,
        failure_reason: None,
        retries: 0,
    },
];

/// The synthetic article set, attributed to the seed job.
pub fn seed_articles() -> Vec<Article> {
    SEEDS
        .iter()
        .enumerate()
        .map(|(index, seed)| Article {
            id: format!("article_{}", index + 1),
            job_id: SEED_JOB_ID.to_string(),
            pmid: seed.pmid.to_string(),
            title: seed.title.to_string(),
            pubmed_url: format!("https://pubmed.ncbi.nlm.nih.gov/{}/", seed.pmid),
            pmc_id: seed.pmc_id.map(str::to_string),
            external_url: seed.external_url.map(str::to_string),
            chosen_pdf_url: seed.chosen_pdf_url.map(str::to_string),
            status: seed.status,
            failure_reason: seed.failure_reason.map(str::to_string),
            retries: seed.retries,
        })
        .collect()
}

/// The seed set re-keyed for `job_id`: ids become `{job_id}_art_{n}`.
pub fn articles_for_job(job_id: &str) -> Vec<Article> {
    seed_articles()
        .into_iter()
        .enumerate()
        .map(|(index, article)| Article {
            id: format!("{}_art_{}", job_id, index + 1),
            job_id: job_id.to_string(),
            ..article
        })
        .collect()
}
