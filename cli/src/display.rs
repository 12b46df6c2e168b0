//! Console rendering of pool and wallet state

use amm_model::{Direction, Pool, SwapQuote, SwapResult, Wallet};
use colored::Colorize;
use std::io::{self, Write};

/// Amounts are shown with six decimals, trailing zeros trimmed.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.6}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Two-column table in the spirit of `console.table`
fn table<W: Write>(out: &mut W, rows: &[(&str, String)]) -> io::Result<()> {
    let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0).max("(index)".len());
    let val_width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0).max("Values".len());
    let rule = |l: &str, m: &str, r: &str| {
        format!("{l}{}{m}{}{r}", "─".repeat(key_width + 2), "─".repeat(val_width + 2))
    };

    writeln!(out, "{}", rule("┌", "┬", "┐").dimmed())?;
    writeln!(
        out,
        "{} {:^kw$} {} {:^vw$} {}",
        "│".dimmed(),
        "(index)",
        "│".dimmed(),
        "Values",
        "│".dimmed(),
        kw = key_width,
        vw = val_width
    )?;
    writeln!(out, "{}", rule("├", "┼", "┤").dimmed())?;
    for (key, value) in rows {
        writeln!(
            out,
            "{} {} {} {} {}",
            "│".dimmed(),
            format!("{:<kw$}", key, kw = key_width).bright_cyan(),
            "│".dimmed(),
            format!("{:>vw$}", value, vw = val_width).bright_yellow(),
            "│".dimmed(),
        )?;
    }
    writeln!(out, "{}", rule("└", "┴", "┘").dimmed())
}

pub fn show_pool<W: Write>(out: &mut W, pool: &Pool) -> io::Result<()> {
    writeln!(out, "{}", "=== Liquidity Pool Status ===".bright_blue().bold())?;
    table(
        out,
        &[
            ("tokenA", format_amount(pool.reserve_a)),
            ("tokenB", format_amount(pool.reserve_b)),
            ("K", format_amount(pool.k)),
        ],
    )?;
    match pool.spot_price(Direction::AToB) {
        Some(price) => {
            writeln!(out, "{} 1 A = {} B", "Spot price:".bright_cyan(), format_amount(price))?;
            writeln!(out, "{} 1 B = {} A", "Spot price:".bright_cyan(), format_amount(1.0 / price))?;
        }
        None => writeln!(out, "{}", "Pool is empty; add liquidity to enable swaps".dimmed())?,
    }
    Ok(())
}

pub fn show_wallet<W: Write>(out: &mut W, wallet: &Wallet) -> io::Result<()> {
    writeln!(out, "{}", "=== User Balance ===".bright_blue().bold())?;
    table(
        out,
        &[
            ("tokenA", format_amount(wallet.balance_a)),
            ("tokenB", format_amount(wallet.balance_b)),
        ],
    )
}

pub fn show_quote<W: Write>(out: &mut W, quote: &SwapQuote) -> io::Result<()> {
    let input = quote.direction.input();
    let output = quote.direction.output();
    writeln!(out, "{}", "=== Swap Preview ===".bright_green().bold())?;
    writeln!(out, "{} {}", "Direction:".bright_cyan(), quote.direction)?;
    writeln!(out, "{} {} {}", "You pay:".bright_cyan(), format_amount(quote.amount_in), input)?;
    writeln!(
        out,
        "{} {} {}",
        "You receive:".bright_cyan(),
        format_amount(quote.amount_out),
        output
    )?;
    writeln!(
        out,
        "{} {} (spot {})",
        "Rate:".bright_cyan(),
        format_amount(quote.effective_price),
        format_amount(quote.spot_price)
    )?;
    writeln!(out, "{} {:.2}%", "Price impact:".bright_cyan(), quote.price_impact_pct)
}

pub fn show_swap<W: Write>(out: &mut W, result: &SwapResult) -> io::Result<()> {
    writeln!(
        out,
        "{} {} {} -> {} {}",
        "✓ Swap executed:".bright_green(),
        format_amount(result.amount_in),
        result.direction.input(),
        format_amount(result.amount_out),
        result.direction.output()
    )
}
