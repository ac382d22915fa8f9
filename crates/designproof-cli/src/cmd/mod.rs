use anyhow::Result;

use crate::args::Cli;

mod issue;

pub fn dispatch(cli: &Cli) -> Result<()> {
    issue::run(cli)
}
