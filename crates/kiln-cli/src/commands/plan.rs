//! Plan command implementation.

use kiln_config::BuildPlan;

use crate::cli::PlanArgs;
use crate::config;
use crate::error::Result;

/// Assemble the plan for the selected mode and print it to stdout.
pub fn execute(args: PlanArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let declarations = config::load_declarations(&args.source, &root)?;
    let mode = config::raw_mode(args.mode.as_deref());

    let plan = declarations.assemble(mode.as_deref())?;
    println!("{}", render(&plan, args.pretty)?);
    Ok(())
}

/// Serialize a plan as compact or pretty JSON.
pub fn render(plan: &BuildPlan, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(plan)?
    } else {
        serde_json::to_string(plan)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::defaults;

    #[test]
    fn render_is_valid_json() {
        let plan = defaults::declarations().unwrap().assemble(Some("production")).unwrap();

        let compact: serde_json::Value = serde_json::from_str(&render(&plan, false).unwrap()).unwrap();
        let pretty: serde_json::Value = serde_json::from_str(&render(&plan, true).unwrap()).unwrap();
        assert_eq!(compact, pretty);
        assert_eq!(compact["mode"], "production");
    }

    #[test]
    fn pretty_output_spans_lines() {
        let plan = defaults::declarations().unwrap().assemble(None).unwrap();
        assert!(!render(&plan, false).unwrap().contains('\n'));
        assert!(render(&plan, true).unwrap().contains('\n'));
    }
}
