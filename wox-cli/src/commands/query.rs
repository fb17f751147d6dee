//! Run one query through the engine

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use wox_core::PluginQueryResult;
use wox_plugin_api::Query;

use super::{start_engine, stop_engine};
use crate::config::WoxConfig;

#[derive(Args)]
pub struct QueryArgs {
    /// Trigger keyword; omit for a global query
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Print the results as UI wire JSON
    #[arg(long)]
    pub json: bool,

    /// Search term
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub term: Vec<String>,
}

impl QueryArgs {
    pub fn to_query(&self) -> Query {
        Query::new(self.keyword.clone().unwrap_or_default(), self.term.join(" "))
    }
}

pub async fn run(args: QueryArgs, config: &WoxConfig) -> Result<()> {
    let manager = start_engine(config).await?;
    let mut results = manager.query(args.to_query()).await;
    sort_for_display(&mut results);

    if args.json {
        let responses: Vec<_> = results
            .iter()
            .enumerate()
            .map(|(index, result)| result.to_response(Some(index)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&responses)?);
    } else if results.is_empty() {
        println!("No results.");
    } else {
        println!("{}", results_table(&results));
    }

    stop_engine(&manager, config).await
}

/// Highest score first; ties keep dispatch order
fn sort_for_display(results: &mut [PluginQueryResult]) {
    results.sort_by(|a, b| b.result.score.cmp(&a.result.score));
}

fn results_table(results: &[PluginQueryResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Subtitle").fg(Color::Cyan),
        Cell::new("Plugin").fg(Color::Cyan),
        Cell::new("Score").fg(Color::Cyan),
    ]);

    for r in results {
        table.add_row(vec![
            Cell::new(&r.result.title),
            Cell::new(&r.result.sub_title),
            Cell::new(r.plugin.name()),
            Cell::new(r.result.score),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: QueryArgs,
    }

    #[test]
    fn test_keyword_query_parsing() {
        let cli = TestCli::parse_from(["test", "--keyword", "calc", "2", "+", "2"]);
        let query = cli.args.to_query();
        assert_eq!(query.trigger_keyword(), "calc");
        assert_eq!(query.search, "2 + 2");
        assert!(!cli.args.json);
    }

    #[test]
    fn test_global_query_parsing() {
        let cli = TestCli::parse_from(["test", "--json", "3", "*", "-4"]);
        let query = cli.args.to_query();
        assert!(query.is_global());
        assert_eq!(query.search, "3 * -4");
        assert!(cli.args.json);
    }

    #[test]
    fn test_term_is_required() {
        assert!(TestCli::try_parse_from(["test", "-k", "calc"]).is_err());
    }
}
