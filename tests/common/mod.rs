#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use bookpeckers_api::{
    error::{ErrorKind, PipelineError, PipelineResult},
    services::{CompletionClient, CompletionOptions},
};

/// Canned behaviour for one kind of prompt
#[derive(Clone)]
pub enum Reply {
    Text(String),
    /// Analysis text built from the requested title
    Echo,
    Fail(ErrorKind),
    Hang,
}

impl Reply {
    pub fn text(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

/// Completion client that answers by prompt kind and counts calls
pub struct ScriptedClient {
    recommendation: Reply,
    validation: Reply,
    analysis_default: Reply,
    analysis_by_title: HashMap<String, Reply>,
    pub recommendation_calls: AtomicUsize,
    pub validation_calls: AtomicUsize,
    pub analysis_calls: AtomicUsize,
    pub analysed_titles: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(recommendation: Reply) -> Self {
        Self {
            recommendation,
            validation: Reply::Fail(ErrorKind::ApiError),
            analysis_default: Reply::Fail(ErrorKind::ApiError),
            analysis_by_title: HashMap::new(),
            recommendation_calls: AtomicUsize::new(0),
            validation_calls: AtomicUsize::new(0),
            analysis_calls: AtomicUsize::new(0),
            analysed_titles: Mutex::new(Vec::new()),
        }
    }

    pub fn validation(mut self, reply: Reply) -> Self {
        self.validation = reply;
        self
    }

    pub fn analysis(mut self, reply: Reply) -> Self {
        self.analysis_default = reply;
        self
    }

    pub fn analysis_for(mut self, title: &str, reply: Reply) -> Self {
        self.analysis_by_title.insert(title.to_string(), reply);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.recommendation_calls.load(Ordering::SeqCst)
            + self.validation_calls.load(Ordering::SeqCst)
            + self.analysis_calls.load(Ordering::SeqCst)
    }

    async fn respond(reply: &Reply, echo: Option<&str>) -> PipelineResult<String> {
        match reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Echo => Ok(echo_analysis(echo.unwrap_or_default())),
            Reply::Fail(kind) => Err(PipelineError::with_diagnostic(*kind, "scripted failure")),
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub fn echo_analysis(title: &str) -> String {
    format!("**Complete Synopsis**\nA study of {title}.\n\n**Key Takeaways**\nRead {title}.")
}

#[async_trait::async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str, _options: CompletionOptions) -> PipelineResult<String> {
        if prompt.contains("BOOKS TO VALIDATE") {
            self.validation_calls.fetch_add(1, Ordering::SeqCst);
            Self::respond(&self.validation, None).await
        } else if prompt.contains("800-word analysis") {
            self.analysis_calls.fetch_add(1, Ordering::SeqCst);
            let title = prompt.split('"').nth(1).unwrap_or_default().to_string();
            self.analysed_titles.lock().unwrap().push(title.clone());
            let reply = self
                .analysis_by_title
                .get(&title)
                .unwrap_or(&self.analysis_default);
            Self::respond(reply, Some(&title)).await
        } else {
            self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
            Self::respond(&self.recommendation, None).await
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub const THREE_BOOKS: &str = r#"Here are three excellent books:
[
  {"title": "Pattern Recognition and Machine Learning", "author": "Christopher M. Bishop", "description": "A comprehensive introduction."},
  {"title": "The Elements of Statistical Learning", "author": "Trevor Hastie", "description": "Statistical foundations."},
  {"title": "Hands-On Machine Learning", "author": "Aurelien Geron", "description": "A practical guide."}
]"#;

pub const THREE_BOOKS_ONE_GIBBERISH: &str = r#"[
  {"title": "Deep Learning", "author": "Ian Goodfellow", "description": "Foundations."},
  {"title": "Neural Networks Explained", "author": "A. B. C. D. E. F. G. H. I. J. K. L. M. N. O. P.", "description": "Everything."},
  {"title": "Grokking Deep Learning", "author": "Andrew Trask", "description": "From scratch."}
]"#;

pub const TWO_SURVIVORS: &str = r#"[
  {"title": "Deep Learning", "author": "Ian Goodfellow", "description": "Foundations."},
  {"title": "Grokking Deep Learning", "author": "Andrew Trask", "description": "From scratch."}
]"#;
