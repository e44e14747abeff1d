pub mod arguments;
pub mod artnet;
pub mod documents;
pub mod logger;
pub mod run;
pub mod sampler;
pub mod settings;
pub mod webserver;
