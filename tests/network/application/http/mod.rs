mod client;
mod request;
