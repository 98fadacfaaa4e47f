//! bc-setup 用ビルドスクリプト。
//!
//! requireAdministrator マニフェストを埋め込む。

fn main() {
    println!("cargo:rerun-if-changed=resources.rc");
    println!("cargo:rerun-if-changed=bc-setup.manifest");
    #[cfg(windows)]
    {
        let _ = embed_resource::compile("resources.rc", embed_resource::NONE);
    }
}
