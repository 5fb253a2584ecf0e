pub mod extraction;
pub mod batch; // Sequential batch extraction with politeness delay
