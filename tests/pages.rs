//! Tests dello stato locale delle pagine, senza passare da HTTP

mod common;

#[cfg(test)]
mod pages_tests {
    use super::common::*;
    use account_hub::core::{AccessPolicy, AccountContext};
    use account_hub::entities::{AccountMembership, AccountRole};
    use account_hub::pages::{AccountPage, Clipboard, MessagesPage};
    use account_hub::store::ACCOUNT_MEMBERSHIPS;
    use std::cell::RefCell;

    struct RecordingClipboard {
        copied: RefCell<Vec<String>>,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<(), String> {
            self.copied.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&self, _text: &str) -> Result<(), String> {
            Err("clipboard permission denied".to_string())
        }
    }

    // ============================================================
    // AccountPage
    // ============================================================

    #[tokio::test]
    async fn test_account_page_loads_snapshot() {
        let backend = create_test_backend().await;
        let page = AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        assert!(page.error.is_none());
        let snapshot = page.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.account.name, "Acme Inc");
        assert_eq!(page.members().len(), 3);
    }

    #[tokio::test]
    async fn test_save_blank_name_stays_local() {
        let backend = create_test_backend().await;
        let store = backend.store.clone();
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        page.begin_edit();
        assert_eq!(page.editing.as_ref().unwrap().input, "Acme Inc");
        page.set_name_input("   ");

        assert!(!page.save_name().await);
        assert_eq!(page.error.as_deref(), Some("Account name cannot be empty"));
        assert!(page.editing.is_some(), "L'editor resta aperto");
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_save_name_refreshes_snapshot() {
        let backend = create_test_backend().await;
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        page.begin_edit();
        page.set_name_input("Acme Group");

        assert!(page.save_name().await);
        assert!(page.editing.is_none());
        assert!(page.error.is_none());
        assert_eq!(page.snapshot.as_ref().unwrap().account.name, "Acme Group");
    }

    #[tokio::test]
    async fn test_guest_rename_shows_error() {
        let backend = create_test_backend().await;
        let mut page =
            AccountPage::open(backend.state, account_context(CAROL, AccountRole::Guest)).await;

        page.begin_edit();
        page.set_name_input("Carol Co");

        assert!(!page.save_name().await);
        assert!(page.error.as_deref().unwrap().starts_with("Insufficient role"));
    }

    #[tokio::test]
    async fn test_change_own_role_is_blocked_locally() {
        let backend = create_test_backend().await;
        let store = backend.store.clone();
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        assert!(!page.change_role(ALICE, AccountRole::Guest).await);
        assert_eq!(page.error.as_deref(), Some("You cannot change your own role"));
        assert!(!page.remove_member(ALICE).await);
        assert_eq!(page.error.as_deref(), Some("You cannot remove yourself"));
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_remove_member_refreshes_members() {
        let backend = create_test_backend().await;
        let store = backend.store.clone();
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        assert!(page.remove_member(CAROL).await);
        assert_eq!(page.members().len(), 2);
        assert!(
            !store
                .records(ACCOUNT_MEMBERSHIPS)
                .iter()
                .any(|m| m["user_id"] == CAROL)
        );
    }

    #[tokio::test]
    async fn test_create_invite_and_copy_url() {
        let backend = create_test_backend().await;
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        let url = page
            .create_invite(Some("new@example.com"), AccountRole::Guest)
            .await
            .unwrap();
        assert!(url.starts_with(&format!("{}/accept-account-invite/", APP_ORIGIN)));
        assert_eq!(page.snapshot.as_ref().unwrap().invites.len(), 2);

        let clipboard = RecordingClipboard {
            copied: RefCell::new(Vec::new()),
        };
        page.copy_invite_url(&clipboard);
        assert_eq!(clipboard.copied.borrow().as_slice(), &[url]);
    }

    #[tokio::test]
    async fn test_clipboard_failure_is_ignored() {
        let backend = create_test_backend().await;
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        page.create_invite(None, AccountRole::Standard).await.unwrap();
        page.copy_invite_url(&BrokenClipboard);

        assert!(page.error.is_none());
    }

    #[tokio::test]
    async fn test_revoke_failure_is_not_shown() {
        let backend = create_test_backend().await;
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        page.revoke_invite("inv-missing").await;

        assert!(page.error.is_none());
        assert_eq!(page.snapshot.as_ref().unwrap().invites.len(), 1);
    }

    #[tokio::test]
    async fn test_revoke_removes_invite_from_snapshot() {
        let backend = create_test_backend().await;
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        page.revoke_invite("inv-open").await;

        assert!(page.snapshot.as_ref().unwrap().invites.is_empty());
    }

    #[tokio::test]
    async fn test_successful_refresh_clears_previous_error() {
        let backend = create_test_backend().await;
        let mut page =
            AccountPage::open(backend.state, account_context(ALICE, AccountRole::Admin)).await;

        page.begin_edit();
        page.set_name_input("");
        assert!(!page.save_name().await);
        assert!(page.error.is_some());

        page.revoke_invite("inv-open").await;

        assert!(page.error.is_none());
        assert!(page.snapshot.as_ref().unwrap().invites.is_empty());
    }

    #[tokio::test]
    async fn test_guest_snapshot_has_no_invite_urls() {
        let backend = create_test_backend().await;
        let page = AccountPage::open(backend.state, account_context(CAROL, AccountRole::Guest)).await;

        let invites = &page.snapshot.as_ref().unwrap().invites;
        assert_eq!(invites.len(), 1);
        assert!(invites[0].invite_code.is_none());
        assert!(invites[0].url.is_none());
    }

    // ============================================================
    // MessagesPage e RenameCategoryModal
    // ============================================================

    #[tokio::test]
    async fn test_messages_page_counts() {
        let backend = create_test_backend().await;
        let page = MessagesPage::open(backend.state, account_context(BOB, AccountRole::Standard)).await;

        assert!(page.error.is_none());
        assert!(page.empty_state().is_none());
        let counts: Vec<(&str, usize)> = page
            .categories()
            .iter()
            .map(|c| (c.id.as_str(), c.message_count))
            .collect();
        assert_eq!(counts, vec![("cat-b", 1), ("cat-a", 2)]);
    }

    #[tokio::test]
    async fn test_messages_page_empty_state() {
        let backend = create_test_backend().await;
        let ctx = AccountContext::new(
            AccountMembership {
                id: "m-alice-2".to_string(),
                account_id: EMPTY_ACCOUNT_ID.to_string(),
                user_id: ALICE.to_string(),
                role: AccountRole::Admin,
                created_at: None,
            },
            &AccessPolicy::default(),
        );

        let page = MessagesPage::open(backend.state, ctx).await;

        assert!(page.categories().is_empty());
        assert!(page.empty_state().is_some());
    }

    #[tokio::test]
    async fn test_rename_modal_rejects_blank_name() {
        let backend = create_test_backend().await;
        let store = backend.store.clone();
        let mut page =
            MessagesPage::open(backend.state, account_context(BOB, AccountRole::Standard)).await;

        assert!(page.open_rename("cat-a"));
        let modal = page.rename_modal.as_mut().unwrap();
        assert_eq!(modal.name(), "Support");
        modal.set_name("  ");

        assert!(!page.save_rename().await);
        let modal = page.rename_modal.as_mut().unwrap();
        assert_eq!(modal.error(), Some("Category name cannot be empty"));
        assert_eq!(store.update_calls(), 0);

        // scrivere di nuovo cancella l'errore
        modal.set_name("Customer care");
        assert!(modal.error().is_none());
    }

    #[tokio::test]
    async fn test_rename_modal_saves_and_closes() {
        let backend = create_test_backend().await;
        let mut page =
            MessagesPage::open(backend.state, account_context(BOB, AccountRole::Standard)).await;

        assert!(page.open_rename("cat-a"));
        page.rename_modal.as_mut().unwrap().set_name("Customer care");

        assert!(page.save_rename().await);
        assert!(page.rename_modal.is_none());
        let renamed = page.categories().iter().find(|c| c.id == "cat-a").unwrap();
        assert_eq!(renamed.name, "Customer care");
        assert_eq!(renamed.message_count, 2);
    }

    #[tokio::test]
    async fn test_rename_modal_shows_role_error() {
        let backend = create_test_backend().await;
        let mut page =
            MessagesPage::open(backend.state, account_context(CAROL, AccountRole::Guest)).await;

        assert!(page.open_rename("cat-b"));
        page.rename_modal.as_mut().unwrap().set_name("Mine");

        assert!(!page.save_rename().await);
        let modal = page.rename_modal.as_ref().unwrap();
        assert!(!modal.saving());
        assert!(modal.error().unwrap().starts_with("Insufficient role"));
    }

    #[tokio::test]
    async fn test_open_rename_unknown_category() {
        let backend = create_test_backend().await;
        let mut page =
            MessagesPage::open(backend.state, account_context(BOB, AccountRole::Standard)).await;

        assert!(!page.open_rename("cat-missing"));
        assert!(page.rename_modal.is_none());
    }
}
