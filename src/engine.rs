use crate::classifier;
use crate::history::{HistoryStore, MemoryHistoryStore};
use crate::probes::{build_all_plans, ProbeContext, ProbePlan};
use crate::resolver::{DnsLookup, Resolver};
use crate::session::Session;
use crate::types::{Config, OsintError, ProbeResult, ProbeStatus, QueryType, SearchReport};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Classifier, probe plans and history wired together.
pub struct OsintEngine {
    config: Config,
    context: ProbeContext,
    plans: HashMap<QueryType, ProbePlan>,
    history: Arc<dyn HistoryStore>,
}

impl OsintEngine {
    pub fn new(config: Config) -> Result<Self, OsintError> {
        let session = Session::new(&config)?;
        let dns: Arc<dyn DnsLookup> = Arc::new(Resolver::new(&config.resolver)?);
        let history: Arc<dyn HistoryStore> = Arc::new(MemoryHistoryStore::new());
        Ok(Self::with_parts(config, session, dns, history))
    }

    pub fn with_parts(
        config: Config,
        session: Session,
        dns: Arc<dyn DnsLookup>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        let context = ProbeContext {
            session,
            dns,
            connect_timeout: config.connect_timeout(),
        };
        let plans = build_all_plans(&config);

        Self {
            config,
            context,
            plans,
            history,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn plan(&self, query_type: QueryType) -> &[Box<dyn crate::probes::Probe>] {
        self.plans.get(&query_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Run every probe planned for `query_type`, concurrently. The returned
    /// list follows plan order; failed or timed-out probes become `error`
    /// records and never abort the others.
    pub async fn dispatch(&self, query: &str, query_type: QueryType) -> Vec<ProbeResult> {
        self.dispatch_with_timeout(query, query_type, self.config.timeout()).await
    }

    async fn dispatch_with_timeout(
        &self,
        query: &str,
        query_type: QueryType,
        budget: Duration,
    ) -> Vec<ProbeResult> {
        let plan = self.plan(query_type);
        let mut futures = FuturesUnordered::new();

        for (idx, probe) in plan.iter().enumerate() {
            let ctx = &self.context;
            futures.push(async move {
                let start = Instant::now();
                let outcome = tokio::time::timeout(budget, probe.run(query, ctx)).await;
                let result = match outcome {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => {
                        warn!("{}: probe failed for {}: {}", probe.name(), query, e);
                        ProbeResult::error(probe.name(), e.to_string(), None)
                    }
                    Err(_) => {
                        warn!("{}: probe timed out after {:?} for {}", probe.name(), budget, query);
                        ProbeResult::error(
                            probe.name(),
                            format!("Timed out after {}s", budget.as_secs_f32()),
                            None,
                        )
                    }
                };
                debug!("{}: {} in {:?}", probe.name(), result.status, start.elapsed());
                (idx, result)
            });
        }

        let mut slots: Vec<Option<ProbeResult>> = vec![None; plan.len()];
        while let Some((idx, result)) = futures.next().await {
            slots[idx] = Some(result);
        }

        slots.into_iter().flatten().collect()
    }

    /// Validate, classify (unless a type is requested), dispatch and record.
    /// Validation errors are returned before any probe runs.
    pub async fn search(
        &self,
        raw_query: &str,
        requested_type: Option<&str>,
        user: Option<&str>,
    ) -> Result<SearchReport, OsintError> {
        let (query, query_type) = classifier::resolve_type(raw_query, requested_type)?;

        info!("Searching {} as {}", query, query_type);
        let start = Instant::now();
        let results = self.dispatch(&query, query_type).await;

        let hits = results.iter().filter(|r| r.status == ProbeStatus::Success).count();
        info!(
            "Completed {} ({}): {}/{} probes succeeded in {:.2}s",
            query,
            query_type,
            hits,
            results.len(),
            start.elapsed().as_secs_f64()
        );

        let report = SearchReport {
            query,
            query_type,
            results,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        if let Some(user) = user.filter(|u| !u.is_empty()) {
            self.history.append(user, report.clone(), self.config.history_capacity);
        }

        Ok(report)
    }

    pub fn history(&self, user: &str) -> Vec<SearchReport> {
        self.history.get(user)
    }
}
