use std::io::Write;

/// Replaces the file at `path` with the concatenation of `chunks`.
///
/// Bytes go to a hidden temporary file in the *same directory* as the target,
/// are synced, and the temporary file is then renamed over the target. The
/// rename is what makes the save atomic, and it only works within one file
/// system, so the temporary file must not live in `/tmp`.
///
/// If the target already exists its permissions are carried over.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or if
/// the final rename fails. The target is left untouched in every error case.
pub fn replace_with<'a, I>(path: impl AsRef<std::path::Path>, chunks: I) -> std::io::Result<u64>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let path = path.as_ref();
    let parent_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let mut temp_save_file = tempfile::Builder::new()
        .prefix(".save_tmp_")
        .tempfile_in(parent_dir)?;
    let mut written = 0u64;

    {
        let mut writer = std::io::BufWriter::new(temp_save_file.as_file_mut());

        for chunk in chunks {
            writer.write_all(chunk)?;
            written += <usize as TryInto<u64>>::try_into(chunk.len())
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        }

        writer.flush()?;
    }

    if let Ok(metadata) = std::fs::metadata(path) {
        temp_save_file
            .as_file()
            .set_permissions(metadata.permissions())?;
    }

    temp_save_file.as_file().sync_all()?;
    // `persist` hands back the temp file on failure; we only need the error.
    // Dropping the returned handle removes the temporary file.
    temp_save_file.persist(path).map_err(|e| e.error)?;

    Ok(written)
}

#[cfg(test)]
mod atomic_tests {
    #[test]
    fn writes_chunks_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        let chunks: [&[u8]; 3] = [b"hello", b"\n", b"world!"];

        let written = super::replace_with(&target, chunks).unwrap();

        assert_eq!(written, 12);
        assert_eq!(std::fs::read(&target).unwrap(), b"hello\nworld!");
    }

    #[test]
    fn replaces_existing_file_and_leaves_no_temp_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("note.md");

        std::fs::write(&target, b"old contents that are longer").unwrap();
        super::replace_with(&target, [&b"new"[..]]).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
        assert_eq!(leftovers(dir.path()), 0, "temporary save file must not survive a save");
    }

    fn leftovers(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".save_tmp_"))
            .count()
    }

    #[test]
    fn missing_parent_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing_dir").join("file.txt");

        assert!(super::replace_with(&target, [&b"data"[..]]).is_err());
        assert!(!target.exists());
    }

    #[test]
    fn failed_rename_keeps_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("note.md");

        // A non-empty directory cannot be renamed over, whoever runs this.
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("inner.txt"), b"keep me").unwrap();

        assert!(super::replace_with(&target, [&b"new"[..]]).is_err());
        assert_eq!(std::fs::read(target.join("inner.txt")).unwrap(), b"keep me");
        assert_eq!(leftovers(dir.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn read_only_dir_keeps_original_bytes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("note.md");

        std::fs::write(&target, b"original").unwrap();
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users can still create files in a read-only directory.
        if std::fs::write(dir.path().join("canary"), b"").is_ok() {
            std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = super::replace_with(&target, [&b"replacement"[..]]);

        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(result.is_err());
        assert_eq!(std::fs::read(&target).unwrap(), b"original");
        assert_eq!(leftovers(dir.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn keeps_permissions_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("script.sh");

        std::fs::write(&target, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755)).unwrap();
        super::replace_with(&target, [&b"#!/bin/sh\necho hi\n"[..]]).unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode();

        assert_eq!(mode & 0o777, 0o755);
    }
}
