mod in_memory;
mod supabase;

pub use in_memory::InMemoryDocumentStore;
pub use supabase::{or_expression, SupabaseDocumentStore};
