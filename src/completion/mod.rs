/*!
 * resql CLI - Completion module
 *
 * Provides the line editor with:
 * - Dot-command completion ranked by shared prefix
 * - SQL identifier completion through the server's completion oracle
 * - Inline hints built from the same candidates
 */

pub mod engine;
pub mod helper;
pub mod hint;
pub mod oracle;
pub mod ranker;

// Re-export main interfaces
pub use helper::ResqlHelper;
