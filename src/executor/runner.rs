//! Run execution: one comment header per run, one result line per term

use crate::{
    error::Result,
    executor::Comparator,
    logging::Logger,
    models::{Query, Run, RunConfig},
    output::OutputCoordinator,
};
use std::io::Write;

/// Executes configured runs and streams their results to the output
pub struct RunExecutor<W: Write> {
    comparator: Comparator,
    output: OutputCoordinator<W>,
    logger: Logger,
}

impl<W: Write> RunExecutor<W> {
    pub fn new(comparator: Comparator, output: OutputCoordinator<W>, logger: Logger) -> Self {
        Self {
            comparator,
            output,
            logger,
        }
    }

    /// Time every term of `run`, in list order
    pub async fn execute(&mut self, run: &Run, repeat: u32) -> Result<()> {
        self.output.write_run_header(run, repeat)?;

        for pattern in run.terms.patterns() {
            let query = Query::new(&run.params, pattern);
            let result = self.comparator.compare(&query, repeat).await?;
            self.output.write_result(&result)?;

            if let Some(corpus) = result.fastest().and_then(|i| self.comparator.corpora().get(i)) {
                self.logger.info(&format!("Fastest for {}: {}", result.term, corpus.url))
                    .field("pattern", &result.term)
                    .field("corpus", &corpus.url)
                    .log();
            }
        }

        Ok(())
    }

    /// Session header, then every run in order; the first error stops everything
    pub async fn execute_all(&mut self, config: &RunConfig) -> Result<()> {
        self.output.write_session_header(self.comparator.corpora())?;

        for (index, run) in config.runs.iter().enumerate() {
            let repeat = config.effective_repeat(run);
            self.logger.info(&format!("Starting run {} of {}", index + 1, config.runs.len()))
                .field("params", run.describe_params())
                .field("terms", run.terms.len())
                .field("repeat", repeat)
                .log();
            self.execute(run, repeat).await?;
        }

        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{test_support::ScriptedClient, ServerTimer};
    use crate::logging::NetworkLogger;
    use crate::models::{Corpus, ParamValue};
    use std::sync::Arc;
    use std::time::Duration;

    fn executor(client: Arc<ScriptedClient>, corpora: Vec<Corpus>) -> RunExecutor<Vec<u8>> {
        let timer = ServerTimer::new(client, NetworkLogger::new(Logger::new("NET".to_string())));
        let comparator = Comparator::new(timer, corpora, Duration::ZERO, Logger::new("COMPARE".to_string()));
        RunExecutor::new(comparator, OutputCoordinator::tsv(Vec::new()), Logger::new("RUN".to_string()))
    }

    fn patterns_sent(client: &ScriptedClient) -> Vec<String> {
        client
            .seen()
            .into_iter()
            .filter_map(|(_, url)| {
                url::Url::parse(&url)
                    .ok()?
                    .query_pairs()
                    .find(|(k, _)| k == "patt")
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }

    #[tokio::test]
    async fn test_words_are_quoted_in_order() {
        let client = Arc::new(ScriptedClient::constant(Duration::from_millis(10)));
        let mut executor = executor(client.clone(), vec![Corpus::new("http://a/c")]);

        executor.execute(&Run::words(["cat", "dog"]), 1).await.unwrap();

        assert_eq!(patterns_sent(&client), vec!["\"cat\"", "\"cat\"", "\"dog\"", "\"dog\""]);
        let text = String::from_utf8(executor.into_output()).unwrap();
        assert_eq!(text, "# (repeat 1)\n\"cat\"\t0.01\n\"dog\"\t0.01\n");
    }

    #[tokio::test]
    async fn test_patterns_pass_through_unmodified() {
        let client = Arc::new(ScriptedClient::constant(Duration::ZERO));
        let mut executor = executor(client.clone(), vec![Corpus::new("http://a/c")]);

        let run = Run::patterns(["[word=\"x\"]"]).with_param("group", ParamValue::Text("hit:word:i".into()));
        executor.execute(&run, 1).await.unwrap();

        assert_eq!(patterns_sent(&client), vec!["[word=\"x\"]", "[word=\"x\"]"]);
        assert!(client.seen()[0].1.contains("group=hit%3Aword%3Ai"));
    }

    #[tokio::test]
    async fn test_execute_all_writes_headers_and_uses_run_repeat() {
        let client = Arc::new(ScriptedClient::constant(Duration::from_millis(20)));
        let corpora = vec![Corpus::new("http://a/c"), Corpus::new("http://b/c")];
        let mut executor = executor(client.clone(), corpora.clone());

        let config = RunConfig {
            corpora,
            repeat: 2,
            runs: vec![
                Run::words(["cat"]),
                Run::patterns(["[]"]).with_repeat(1).with_param("usecache", ParamValue::Text("no".into())),
            ],
            ..serde_json::from_str(r#"{"corpora": ["http://x/c"], "repeat": 1, "runs": [{"words": ["x"]}]}"#).unwrap()
        };
        executor.execute_all(&config).await.unwrap();

        // (2 + 1) * 2 corpora, then (1 + 1) * 2 corpora
        assert_eq!(client.seen().len(), 10);

        let text = String::from_utf8(executor.into_output()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# term\thttp://a/c\thttp://b/c",
                "# (repeat 2)",
                "\"cat\"\t0.02\t0.02",
                "# usecache=no (repeat 1)",
                "[]\t0.02\t0.02",
            ]
        );
    }

    #[tokio::test]
    async fn test_error_stops_remaining_runs() {
        let client = Arc::new(ScriptedClient::scripted(
            vec![(200, Duration::ZERO), (200, Duration::ZERO), (500, Duration::ZERO)],
            (200, Duration::ZERO),
        ));
        let mut executor = executor(client.clone(), vec![Corpus::new("http://a/c")]);

        let config: RunConfig = serde_json::from_str(
            r#"{"corpora": ["http://a/c"], "repeat": 1, "runs": [{"words": ["a", "b"]}, {"words": ["c"]}]}"#,
        )
        .unwrap();
        let error = executor.execute_all(&config).await.unwrap_err();

        assert_eq!(error.exit_code(), 2);
        assert_eq!(client.seen().len(), 3);
        let text = String::from_utf8(executor.into_output()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
