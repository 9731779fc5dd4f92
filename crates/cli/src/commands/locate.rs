use bunsenite_core::Result;
use bunsenite_ffi_bridge::LibraryLocator;

pub fn execute(locator: &LibraryLocator) -> Result<()> {
    let path = locator.locate()?;
    println!("{}", path.display());
    Ok(())
}
