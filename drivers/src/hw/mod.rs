pub mod ti;
