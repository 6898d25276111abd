mod cost;
mod notify;
mod snapshot;
mod support;
mod validator;
