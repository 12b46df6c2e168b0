//! Interactive menu loop
//!
//! The loop only dispatches: each [`Action`] maps to a handler that prompts
//! for its inputs, calls the engine and prints the outcome. Engine failures
//! are printed and the loop moves on to the next prompt; only a closed input
//! stream or a broken output ends it early.

use amm_model::{AmmError, Direction, PoolEngine, StateStore, StoreError};
use anyhow::Result;
use colored::Colorize;
use log::debug;
use std::io::{BufRead, Write};

use crate::display::{self, format_amount};
use crate::prompt::{PromptError, PromptResult, Prompter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddLiquidity,
    Swap,
    ViewPool,
    ViewBalance,
    Exit,
}

pub const MENU: [(Action, &str); 5] = [
    (Action::AddLiquidity, "Add Liquidity"),
    (Action::Swap, "Swap"),
    (Action::ViewPool, "View Pool Status"),
    (Action::ViewBalance, "View User Balance"),
    (Action::Exit, "Exit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

type Handler<S, R, W> = fn(&mut Session<S, R, W>) -> PromptResult<Flow>;

impl Action {
    fn handler<S, R, W>(self) -> Handler<S, R, W>
    where
        S: StateStore,
        R: BufRead,
        W: Write,
    {
        match self {
            Action::AddLiquidity => add_liquidity,
            Action::Swap => swap,
            Action::ViewPool => view_pool,
            Action::ViewBalance => view_balance,
            Action::Exit => exit,
        }
    }
}

pub struct Session<S, R, W> {
    engine: PoolEngine<S>,
    prompter: Prompter<R, W>,
}

impl<S: StateStore, R: BufRead, W: Write> Session<S, R, W> {
    pub fn new(engine: PoolEngine<S>, prompter: Prompter<R, W>) -> Self {
        Self { engine, prompter }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (PoolEngine<S>, Prompter<R, W>) {
        (self.engine, self.prompter)
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let flow = match self.prompter.select("Choose an action:", &MENU) {
                Ok(action) => {
                    debug!("menu action: {:?}", action);
                    let handler: Handler<S, R, W> = action.handler();
                    handler(self)
                }
                Err(e) => Err(e),
            };

            match flow {
                Ok(Flow::Continue) => writeln!(self.prompter.out())?,
                Ok(Flow::Exit) => return Ok(()),
                Err(PromptError::Closed) => {
                    writeln!(self.prompter.out(), "{}", "Input closed, exiting...".yellow())?;
                    return Ok(());
                }
                Err(PromptError::Io(e)) => return Err(e.into()),
            }
        }
    }

    fn report(&mut self, err: &AmmError) -> PromptResult<()> {
        let out = self.prompter.out();
        writeln!(out, "{} {}", "✗".bright_red(), err.to_string().bright_red())?;
        if let AmmError::Persistence(StoreError::NotFound { .. }) = err {
            writeln!(out, "{}", "  Run `dex-sim init` to create the state file.".dimmed())?;
        }
        Ok(())
    }

    fn cancelled(&mut self) -> PromptResult<Flow> {
        writeln!(
            self.prompter.out(),
            "{}",
            "Cancelled; nothing was changed.".yellow()
        )?;
        Ok(Flow::Continue)
    }
}

fn add_liquidity<S: StateStore, R: BufRead, W: Write>(
    session: &mut Session<S, R, W>,
) -> PromptResult<Flow> {
    let amount = session.prompter.amount("Token A amount to add to the pool:")?;
    writeln!(
        session.prompter.out(),
        "{} {} Token A + {} Token B",
        "Deposit:".bright_cyan(),
        format_amount(amount),
        format_amount(amount)
    )?;
    if !session.prompter.confirm("Add liquidity?", true)? {
        return session.cancelled();
    }

    match session.engine.add_liquidity(amount) {
        Ok(pool) => {
            let out = session.prompter.out();
            writeln!(out, "{}", "Liquidity added successfully!".bright_green())?;
            display::show_pool(out, &pool)?;
        }
        Err(e) => session.report(&e)?,
    }
    Ok(Flow::Continue)
}

fn swap<S: StateStore, R: BufRead, W: Write>(
    session: &mut Session<S, R, W>,
) -> PromptResult<Flow> {
    let directions: Vec<(Direction, String)> =
        Direction::ALL.iter().map(|d| (*d, d.to_string())).collect();
    let direction = session.prompter.select("Which swap do you want to make?", &directions)?;
    let amount = session.prompter.amount("Amount to swap:")?;

    let quote = match session.engine.quote(direction, amount) {
        Ok(quote) => quote,
        Err(e) => {
            session.report(&e)?;
            return Ok(Flow::Continue);
        }
    };
    display::show_quote(session.prompter.out(), &quote)?;
    if !session.prompter.confirm("Execute swap?", true)? {
        return session.cancelled();
    }

    match session.engine.swap(direction, amount) {
        Ok(result) => {
            let out = session.prompter.out();
            display::show_swap(out, &result)?;
            writeln!(out, "{}", "Swap completed successfully!".bright_green())?;
            display::show_wallet(out, &result.wallet)?;
        }
        Err(e) => session.report(&e)?,
    }
    Ok(Flow::Continue)
}

fn view_pool<S: StateStore, R: BufRead, W: Write>(
    session: &mut Session<S, R, W>,
) -> PromptResult<Flow> {
    match session.engine.pool_status() {
        Ok(pool) => display::show_pool(session.prompter.out(), &pool)?,
        Err(e) => session.report(&e)?,
    }
    Ok(Flow::Continue)
}

fn view_balance<S: StateStore, R: BufRead, W: Write>(
    session: &mut Session<S, R, W>,
) -> PromptResult<Flow> {
    match session.engine.user_balance() {
        Ok(wallet) => display::show_wallet(session.prompter.out(), &wallet)?,
        Err(e) => session.report(&e)?,
    }
    Ok(Flow::Continue)
}

fn exit<S: StateStore, R: BufRead, W: Write>(
    session: &mut Session<S, R, W>,
) -> PromptResult<Flow> {
    writeln!(session.prompter.out(), "{}", "Exiting...".yellow())?;
    Ok(Flow::Exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amm_model::{MemoryStore, Pool, State, Wallet};
    use std::io::Cursor;

    type TestSession = Session<MemoryStore, Cursor<Vec<u8>>, Vec<u8>>;

    fn reference_state() -> State {
        State::new(Pool::new(100.0, 100.0), Wallet::new(50.0, 0.0))
    }

    fn session(store: MemoryStore, script: &str) -> TestSession {
        colored::control::set_override(false);
        Session::new(
            PoolEngine::new(store),
            Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new()),
        )
    }

    /// Run the script to completion, returning final state and transcript.
    fn run(store: MemoryStore, script: &str) -> (MemoryStore, String) {
        let mut session = session(store, script);
        session.run().unwrap();
        let (engine, mut prompter) = session.into_parts();
        let transcript = String::from_utf8(std::mem::take(prompter.out())).unwrap();
        (engine.into_store(), transcript)
    }

    #[test]
    fn test_exit_action() {
        let (store, text) = run(MemoryStore::new(reference_state()), "5\n");
        assert!(text.contains("Exiting..."));
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn test_eof_ends_loop() {
        let (_, text) = run(MemoryStore::new(reference_state()), "");
        assert!(text.contains("Input closed"));
    }

    #[test]
    fn test_swap_flow() {
        let (store, text) = run(MemoryStore::new(reference_state()), "2\n1\n10\ny\n5\n");
        let state = store.state().copied().unwrap();
        assert_eq!(state.pool.reserve_a, 110.0);
        assert_eq!(state.wallet.balance_a, 40.0);
        assert!(text.contains("1) Token A -> Token B"));
        assert!(text.contains("2) Token B -> Token A"));
        assert!(text.contains("Swap Preview"));
        assert!(text.contains("9.090909"));
        assert!(text.contains("Swap completed successfully!"));
    }

    #[test]
    fn test_swap_declined() {
        let (store, text) = run(MemoryStore::new(reference_state()), "swap\n1\n10\nn\nexit\n");
        assert_eq!(store.state(), Some(&reference_state()));
        assert_eq!(store.saves(), 0);
        assert!(text.contains("Cancelled; nothing was changed."));
    }

    #[test]
    fn test_swap_insufficient_balance_continues() {
        let script = "2\n2\n1\n4\n5\n";
        let (store, text) = run(MemoryStore::new(reference_state()), script);
        assert!(text.contains("Insufficient Token B balance"));
        assert!(text.contains("User Balance"));
        assert_eq!(store.state(), Some(&reference_state()));
    }

    #[test]
    fn test_add_liquidity_flow() {
        let (store, text) = run(MemoryStore::new(reference_state()), "1\nabc\n25\n\n3\n5\n");
        let state = store.state().copied().unwrap();
        assert_eq!(state.pool, Pool::new(125.0, 125.0));
        assert_eq!(state.wallet, reference_state().wallet);
        assert!(text.contains("Please enter a number greater than zero"));
        assert!(text.contains("Liquidity added successfully!"));
        assert!(text.contains("15625"));
    }

    #[test]
    fn test_out_of_range_liquidity_reported() {
        let (store, text) = run(MemoryStore::new(reference_state()), "1\n1e200\ny\n3\n5\n");
        assert!(text.contains("result is out of range"));
        assert!(text.contains("Liquidity Pool Status"));
        assert_eq!(store.state(), Some(&reference_state()));
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn test_missing_state_is_reported_not_fatal() {
        let (_, text) = run(MemoryStore::empty(), "3\n4\n5\n");
        assert_eq!(text.matches("State file not found").count(), 2);
        assert!(text.contains("dex-sim init"));
        assert!(text.contains("Exiting..."));
    }

    #[test]
    fn test_write_failure_reported() {
        let mut store = MemoryStore::new(reference_state());
        store.fail_next_save();
        let (store, text) = run(store, "1\n5\ny\n5\n");
        assert!(text.contains("Failed to write state"));
        assert_eq!(store.state(), Some(&reference_state()));
    }
}
