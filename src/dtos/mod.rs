//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server
//! e i payload parziali inviati al record store.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod account;
pub mod category;
pub mod invite;
pub mod membership;
pub mod query;

pub use account::{AccountDTO, AccountPageDTO, MyAccountDTO, RenameAccountDTO, UpdateAccountDTO};
pub use category::{
    CategoryDTO, EMPTY_STATE_TEXT, MessagesPageDTO, RenameCategoryDTO, UpdateCategoryDTO,
    browse_url,
};
pub use invite::{CreateInviteDTO, CreateInviteRequestDTO, InviteDTO, UpdateInviteDTO, invite_url};
pub use membership::{CreateMembershipDTO, MemberDTO, UpdateMembershipDTO};
pub use query::LogoUploadQuery;
