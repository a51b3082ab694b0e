pub mod trade_cycle;
