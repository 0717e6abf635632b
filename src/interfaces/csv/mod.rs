pub mod command_reader;
pub mod wallet_writer;
