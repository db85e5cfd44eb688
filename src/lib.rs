pub mod core;
pub mod storage;
pub mod index;
pub mod query;
pub mod search;

pub use crate::core::config::Config;
pub use crate::core::database::Database;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{DocId, Document, Value};
pub use crate::search::results::{SearchHit, SearchResults};

/*
┌──────────────────────────────────────────────────────────────────────────────────┐
│                              DOCDB STRUCT ARCHITECTURE                            │
└──────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── CORE LAYER ──────────────────────────────────┐
│                                                                                  │
│  ┌────────────────────────────────────────────────────────────────────────┐     │
│  │                           struct Database                               │     │
│  │ config: Config                      // TTLs + janitor interval          │     │
│  │ documents: Arc<DocumentStore>       // id -> JSON bytes                 │     │
│  │ index: Arc<IndexStore>              // index key -> ids                 │     │
│  │ query_parser: QueryParser           // query string -> Query            │     │
│  │ query_executor: QueryExecutor       // index probe + re-verification    │     │
│  └────────────────────────────────────────────────────────────────────────┘     │
│                                                                                  │
│  ┌──────────────────┐  ┌──────────────────────┐  ┌──────────────────────────┐   │
│  │ struct DocId     │  │ enum Value           │  │ struct Document          │   │
│  │ • 0: String      │  │ • Null  • Bool       │  │ • fields: HashMap<String,│   │
│  │   (uuid v4)      │  │ • Number(f64)        │  │   Value>                 │   │
│  └──────────────────┘  │ • String • Array     │  └──────────────────────────┘   │
│                        │ • Object             │                                  │
│                        └──────────────────────┘                                  │
└──────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── STORAGE / INDEX LAYER ────────────────────────────┐
│                                                                                  │
│  ┌────────────────────────────┐   ┌────────────────────────────────────────┐    │
│  │ struct ExpiringCache<K, V> │   │ flatten(&Document) -> IndexKeys        │    │
│  │ • entries: RwLock<HashMap> │   │ • paths:       "a.b.c"                 │    │
│  │ • ttl: Option<Duration>    │   │ • path_values: "a.b.c=1"               │    │
│  │ • janitor: Option<Janitor> │   │ arrays are never descended             │    │
│  └────────────────────────────┘   └────────────────────────────────────────┘    │
│                                                                                  │
│  DocumentStore = ExpiringCache<DocId, Vec<u8>>                                   │
│  IndexStore    = ExpiringCache<String, HashSet<DocId>>                           │
└──────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── SEARCH LAYER ────────────────────────────────┐
│                                                                                  │
│  "a.b:>1 c:x"                                                                    │
│       │ Lexer      Segment(a) Segment(b) Operator(Gt) Value(1) Segment(c) ...    │
│       │ Parser     Query { clauses: [a.b > 1, c = x] }                           │
│       ▼                                                                          │
│  QueryExecutor                                                                   │
│   1. index key per clause     "a.b" (relational)   "c=x" (equality)            │
│   2. count ids across lookups, keep count == clause count                        │
│   3. load candidates, drop expired ones                                          │
│   4. DocumentMatcher re-checks every clause on the live document                 │
└──────────────────────────────────────────────────────────────────────────────────┘
*/
