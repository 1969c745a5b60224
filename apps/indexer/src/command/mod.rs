pub mod backfill;
pub mod run;
pub mod windows;

use crate::error::Result;

pub use backfill::BackfillCommand;
pub use run::RunCommand;
pub use windows::WindowsCommand;

#[async_trait::async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
