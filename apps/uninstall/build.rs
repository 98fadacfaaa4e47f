//! bc-uninstall 用ビルドスクリプト。

fn main() {
    println!("cargo:rerun-if-changed=resources.rc");
    println!("cargo:rerun-if-changed=bc-uninstall.manifest");
    #[cfg(windows)]
    {
        let _ = embed_resource::compile("resources.rc", embed_resource::NONE);
    }
}
