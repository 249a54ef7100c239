mod param_map;

pub use param_map::ParamMap;
