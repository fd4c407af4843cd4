//! # UnitXchange Units Command
//!
//! File: cli/src/commands/units.rs
//!
//! Without an argument, lists the ten categories; with a category name, lists
//! the units that category offers (in the order the converter page shows them).
//!
use crate::conversion::units::Category;
use crate::core::error::Result;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct UnitsArgs {
    /// Category whose units should be listed.
    pub category: Option<String>,
}

pub async fn handle_units(args: UnitsArgs) -> Result<()> {
    for line in units_listing(args.category.as_deref())? {
        println!("{}", line);
    }
    Ok(())
}

fn units_listing(category: Option<&str>) -> Result<Vec<String>> {
    match category {
        None => Ok(Category::ALL.iter().map(|c| c.label()).collect()),
        Some(name) => {
            let category: Category = name.parse()?;
            let mut lines = vec![format!("{}:", category.label())];
            lines.extend(category.units().into_iter().map(|u| format!("  {}", u)));
            Ok(lines)
        }
    }
}
