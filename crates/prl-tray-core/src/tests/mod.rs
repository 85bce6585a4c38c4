mod executor;
mod poller;
mod support;
