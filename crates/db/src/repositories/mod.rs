mod kit_repo;

pub use kit_repo::KitRepo;
