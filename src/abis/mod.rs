pub mod factory;

pub use factory::IUniswapV2Factory;
