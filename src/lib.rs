/*!
 * # Nudge - Constant-Product Pool Resolver and Swap Sizer
 *
 * Nudge derives the address of a constant-product pool from its two tokens,
 * reads the pool's reserves in the caller's token order, and computes the
 * exact input needed to move the pool's price to a target.
 *
 * ## Module Structure
 *
 * - `pool`: Pool resolution, ledger reads and swap sizing
 * - `config`: Configuration management for the system
 * - `utils`: Utility functions and helpers
 */

/// Configuration management for the system
pub mod config;
/// Pool resolution, ledger reads and swap sizing
pub mod pool;
/// Utility functions and helpers
pub mod utils;
