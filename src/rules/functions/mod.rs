pub mod count_impl;
pub use count_impl::*;

pub mod sum_impl;
pub use sum_impl::*;

pub mod avg_impl;
pub use avg_impl::*;

pub mod minmax_impl;
pub use minmax_impl::*;

pub mod statistical_impl;
pub use statistical_impl::*;
