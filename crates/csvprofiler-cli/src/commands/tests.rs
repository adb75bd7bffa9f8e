//! Tests command - list the built-in column tests.

use colored::Colorize;
use csvprofiler::registry::catalogue;

pub fn run(verbose: bool) -> Result<i32, Box<dyn std::error::Error>> {
    println!("{}", "Built-in tests:".yellow().bold());
    for test in catalogue() {
        println!("  {}", test.to_string().white());
    }

    println!();
    println!("{}", "Parameterised tests:".yellow().bold());
    println!("  {:18} pattern in User Data, or loaded from regex_<name>.txt", "regex_<name>");
    println!("  {:18} values in User Data, or loaded from lookup_<name>.txt", "lookup_<name>");
    println!("  {:18} inclusive int, float or date (dYYYYMMDD) range", "range(a:b)");
    println!("  {:18} rule table <table>.csv keyed by the User Data column", "xref_<table>");
    println!("  {:18} registered function", "custom_<name>");

    if verbose {
        println!();
        println!("  {:18} no main test, only length and blank checks", "anything");
    }
    Ok(0)
}
