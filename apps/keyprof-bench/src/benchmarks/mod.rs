pub mod fetch_throughput;
pub mod insert_throughput;
pub mod profile_throughput;
