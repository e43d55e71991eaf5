pub mod audit;
pub mod bpd;
pub mod menu;
pub mod role;
pub mod user;

pub use audit::{LogSystem, LoginActivity, LoginStatus, NewLogSystem, NewLoginActivity};
pub use bpd::{
    Biaya, BpdAction, Dokumen, Histori, Kendaraan, NewBiaya, NewDokumen, NewKendaraan, NewPerjalananDinas,
    PerjalananDinas, StatusBpd,
};
pub use menu::{Menu, MenuUser, NewMenu, NewMenuUser, RoleMenu, SortDirection};
pub use role::{NewRole, Role};
pub use user::{NewUser, User, UserChanges};
