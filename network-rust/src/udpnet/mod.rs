pub mod rpc;
mod sock;
