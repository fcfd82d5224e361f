/*!
 * Ethernity Core
 * 
 * Tipos de erro e utilitários compartilhados para a workspace Ethernity
 */

pub mod utils;
pub mod error;

// Re-exportações públicas
pub use error::{Error, Result};
