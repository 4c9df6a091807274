//! Shared application state.

use std::sync::Arc;

use puppet_shared::time::SystemClock;

use crate::{
    domain::{IdentityStore, RoomRegistry, UserRepository},
    infrastructure::RoomHub,
    usecase::{
        AuthPolicy, AuthenticateUseCase, CreateRoomUseCase, DeleteRoomUseCase, GetProfileUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, GetSessionsUseCase, GetUsersUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, LoginUseCase, RouteMessageUseCase,
        UpdateProfileUseCase,
    },
};

/// Shared application state
pub struct AppState {
    // room core
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub route_message_usecase: Arc<RouteMessageUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub delete_room_usecase: Arc<DeleteRoomUseCase>,
    // accounts
    pub login_usecase: Arc<LoginUseCase>,
    pub authenticate_usecase: Arc<AuthenticateUseCase>,
    pub get_profile_usecase: Arc<GetProfileUseCase>,
    pub update_profile_usecase: Arc<UpdateProfileUseCase>,
    pub get_users_usecase: Arc<GetUsersUseCase>,
    pub get_sessions_usecase: Arc<GetSessionsUseCase>,
    // room metadata
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl AppState {
    /// Wire every use case on top of the given collaborators.
    ///
    /// A fresh `RoomHub` is created; it lives as long as the returned state.
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        user_repository: Arc<dyn UserRepository>,
        room_registry: Arc<dyn RoomRegistry>,
        policy: AuthPolicy,
    ) -> Self {
        let hub = Arc::new(RoomHub::new());

        Self {
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                identity_store.clone(),
                room_registry.clone(),
                hub.clone(),
            )),
            route_message_usecase: Arc::new(RouteMessageUseCase::new(hub.clone())),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(hub.clone())),
            delete_room_usecase: Arc::new(DeleteRoomUseCase::new(
                room_registry.clone(),
                hub.clone(),
            )),
            login_usecase: Arc::new(LoginUseCase::new(
                identity_store.clone(),
                user_repository.clone(),
                policy,
            )),
            authenticate_usecase: Arc::new(AuthenticateUseCase::new(identity_store.clone())),
            get_profile_usecase: Arc::new(GetProfileUseCase::new(user_repository.clone())),
            update_profile_usecase: Arc::new(UpdateProfileUseCase::new(user_repository.clone())),
            get_users_usecase: Arc::new(GetUsersUseCase::new(user_repository)),
            get_sessions_usecase: Arc::new(GetSessionsUseCase::new(identity_store)),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                room_registry.clone(),
                Arc::new(SystemClock),
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(room_registry.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(room_registry, hub)),
        }
    }
}
